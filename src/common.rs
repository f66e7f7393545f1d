use crate::config::Config;
use crate::providers::{Provider, ProviderConfig};
use anyhow::Result;
use clap::Args;

#[derive(Args, Clone, Default, Debug)]
pub struct CommonParams {
    /// Override default LLM provider
    #[arg(long, help = "Override default LLM provider", value_parser = available_providers_parser)]
    pub provider: Option<String>,

    /// Override the model for the selected provider
    #[arg(long, help = "Override the model for the selected provider")]
    pub model: Option<String>,
}

impl CommonParams {
    /// Apply the overrides to `config`, returning whether anything changed
    pub fn apply_to_config(&self, config: &mut Config) -> Result<bool> {
        let mut changes_made = false;

        if let Some(provider_str) = &self.provider {
            let provider: Provider = provider_str.parse()?;
            let provider_name = provider.name().to_string();

            if config.default_provider != provider_name {
                if !config.providers.contains_key(&provider_name) {
                    config.providers.insert(
                        provider_name.clone(),
                        ProviderConfig::with_defaults(provider),
                    );
                }

                config.default_provider = provider_name;
                changes_made = true;
            }
        }

        if let Some(model) = &self.model {
            let provider = config.provider()?;
            let provider_config = config
                .providers
                .entry(provider.name().to_string())
                .or_insert_with(|| ProviderConfig::with_defaults(provider));
            if &provider_config.model != model {
                provider_config.model.clone_from(model);
                changes_made = true;
            }
        }

        Ok(changes_made)
    }
}

/// Validates that a provider name is available in the system
pub fn available_providers_parser(s: &str) -> Result<String, String> {
    match s.parse::<Provider>() {
        Ok(provider) => Ok(provider.name().to_string()),
        Err(_) => Err(format!(
            "Invalid provider '{}'. Available providers: {}",
            s,
            Provider::all_names().join(", ")
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parser_normalizes_aliases() {
        assert_eq!(available_providers_parser("gemini"), Ok("google".to_string()));
        assert!(available_providers_parser("clippy").is_err());
    }

    #[test]
    fn test_apply_to_config_switches_provider_and_model() {
        let mut config = Config::default();
        let params = CommonParams {
            provider: Some("openai".to_string()),
            model: Some("gpt-4.1".to_string()),
        };

        assert!(params.apply_to_config(&mut config).expect("overrides apply"));
        assert_eq!(config.default_provider, "openai");
        assert_eq!(config.provider_config(Provider::OpenAI).model, "gpt-4.1");
        assert!(!params.apply_to_config(&mut config).expect("overrides apply"));
    }
}
