//! Configuration loaded from environment variables (and `.env`, if present).

use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use agent_gateway::AgentConfig;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub addr: SocketAddr,
    /// Directory holding the collection files.
    pub data_dir: PathBuf,
    pub conversations_file: String,
    pub messages_file: String,
    /// Model provider settings.
    pub agent: AgentConfig,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `OPENAI_API_KEY` | Model provider API key | (required) |
    /// | `AGENT_HOST` | Bind host | `0.0.0.0` |
    /// | `AGENT_PORT` | Bind port | `8001` |
    /// | `AGENT_DATA_DIR` | Data directory | `data` |
    /// | `AGENT_CONVERSATIONS_FILE` | Conversations file name | `conversations.json` |
    /// | `AGENT_MESSAGES_FILE` | Messages file name | `messages.json` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(env::vars().collect())
    }

    fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let var = |key: &str, default: &str| {
            vars.get(key).cloned().unwrap_or_else(|| default.to_string())
        };

        let api_key = vars
            .get("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .cloned()
            .ok_or(ConfigError::MissingApiKey)?;

        let host = var("AGENT_HOST", "0.0.0.0");
        let port = var("AGENT_PORT", "8001");
        let addr = format!("{}:{}", host, port)
            .parse()
            .map_err(|_| ConfigError::InvalidAddr(format!("{}:{}", host, port)))?;

        let mut agent = AgentConfig::new(api_key);
        if let Some(base_url) = vars.get("OPENAI_BASE_URL") {
            agent.base_url = base_url.clone();
        }
        if let Some(model) = vars.get("AGENT_MODEL") {
            agent.model = model.clone();
        }
        if let Some(prompt) = vars.get("AGENT_SYSTEM_PROMPT") {
            agent.system_prompt = prompt.clone();
        }

        Ok(Self {
            addr,
            data_dir: PathBuf::from(var("AGENT_DATA_DIR", "data")),
            conversations_file: var("AGENT_CONVERSATIONS_FILE", "conversations.json"),
            messages_file: var("AGENT_MESSAGES_FILE", "messages.json"),
            agent,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is missing")]
    MissingApiKey,

    #[error("Invalid bind address: {0}")]
    InvalidAddr(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(vars(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
        assert_eq!(config.addr, "0.0.0.0:8001".parse::<SocketAddr>().unwrap());
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.conversations_file, "conversations.json");
        assert_eq!(config.messages_file, "messages.json");
        assert_eq!(config.agent.api_key, "sk-test");
        assert_eq!(config.agent.model, "gpt-4o");
    }

    #[test]
    fn test_missing_api_key_fails() {
        assert!(matches!(Config::from_vars(vars(&[])), Err(ConfigError::MissingApiKey)));
        assert!(matches!(
            Config::from_vars(vars(&[("OPENAI_API_KEY", "  ")])),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(vars(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("AGENT_HOST", "127.0.0.1"),
            ("AGENT_PORT", "9000"),
            ("AGENT_DATA_DIR", "/var/lib/agent"),
            ("AGENT_CONVERSATIONS_FILE", "convs.json"),
            ("AGENT_MESSAGES_FILE", "msgs.json"),
            ("OPENAI_BASE_URL", "http://localhost:11434/v1"),
            ("AGENT_MODEL", "llama3"),
        ]))
        .unwrap();
        assert_eq!(config.addr, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/agent"));
        assert_eq!(config.conversations_file, "convs.json");
        assert_eq!(config.messages_file, "msgs.json");
        assert_eq!(config.agent.base_url, "http://localhost:11434/v1");
        assert_eq!(config.agent.model, "llama3");
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_vars(vars(&[("OPENAI_API_KEY", "k"), ("AGENT_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAddr(_)));
    }
}
