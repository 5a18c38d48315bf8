use std::path::PathBuf;
use std::time::Duration;

use super::yaml::YamlConfig;
use super::{ServerConfig, TlsConfig, env};

/// Load environment configuration and apply YAML overrides on top.
///
/// Any value present in the YAML file wins over the environment.
pub fn merge_config(yaml: Option<YamlConfig>) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let mut config = env::load_from_env()?;

    let Some(yaml) = yaml else {
        return Ok(config);
    };

    if let Some(server) = yaml.server {
        if let Some(host) = server.host {
            config.host = host;
        }
        if let Some(port) = server.port {
            config.port = port;
        }
        if let Some(url) = server.public_base_url {
            config.public_base_url = Some(url);
        }
        if let Some(dir) = server.static_dir {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(tls) = server.tls {
            match tls.enabled {
                Some(false) => config.tls = None,
                Some(true) => {
                    let cert_path = tls
                        .cert_path
                        .or_else(|| {
                            config
                                .tls
                                .as_ref()
                                .map(|t| t.cert_path.display().to_string())
                        })
                        .ok_or("server.tls.enabled is true but cert_path is not set")?;
                    let key_path = tls
                        .key_path
                        .or_else(|| {
                            config
                                .tls
                                .as_ref()
                                .map(|t| t.key_path.display().to_string())
                        })
                        .ok_or("server.tls.enabled is true but key_path is not set")?;
                    config.tls = Some(TlsConfig {
                        cert_path: PathBuf::from(cert_path),
                        key_path: PathBuf::from(key_path),
                    });
                }
                None => {}
            }
        }
    }

    if let Some(twilio) = yaml.twilio {
        if let Some(sid) = twilio.account_sid {
            config.twilio_account_sid = Some(sid);
        }
        if let Some(token) = twilio.auth_token {
            config.twilio_auth_token = Some(token);
        }
        if let Some(from) = twilio.from_number {
            config.twilio_phone_number = Some(from);
        }
        if let Some(to) = twilio.to_number {
            config.to_phone_number = Some(to);
        }
        if let Some(url) = twilio.api_base_url {
            config.twilio_api_base_url = url;
        }
        if let Some(validate) = twilio.validate_signatures {
            config.twilio_validate_signatures = validate;
        }
    }

    if let Some(llm) = yaml.llm {
        if let Some(key) = llm.api_key {
            config.groq_api_key = Some(key);
        }
        if let Some(url) = llm.base_url {
            config.groq_base_url = url;
        }
        if let Some(model) = llm.model {
            config.groq_model = model;
        }
        if let Some(secs) = llm.timeout_seconds {
            config.llm_timeout = Duration::from_secs(secs);
        }
    }

    if let Some(agent) = yaml.agent {
        if let Some(voice) = agent.voice {
            config.voice_name = voice;
        }
        if let Some(language) = agent.language {
            config.voice_language = language;
        }
        if let Some(secs) = agent.gather_timeout_seconds {
            config.gather_timeout_seconds = secs;
        }
        if let Some(max) = agent.max_silent_reprompts {
            config.max_silent_reprompts = max;
        }
    }

    if let Some(security) = yaml.security {
        if let Some(origins) = security.cors_allowed_origins {
            config.cors_allowed_origins = Some(origins);
        }
        if let Some(rps) = security.rate_limit_requests_per_second {
            config.rate_limit_requests_per_second = rps;
        }
        if let Some(burst) = security.rate_limit_burst_size {
            config.rate_limit_burst_size = burst;
        }
    }

    Ok(config)
}
