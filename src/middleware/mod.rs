pub mod signature;

// Re-export middleware functions
pub use signature::twilio_signature_middleware;
