use anyhow::anyhow;
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;

use crate::configuration::GeneratorSettings;

const SYSTEM_PROMPT: &str =
    "Du bist ein Analyst für Unternehmensprofile. Antworte ausschließlich mit einem gültigen JSON-Objekt.";

/// A text-completion backend that answers a prompt with raw JSON text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete_json(&self, prompt: &str) -> anyhow::Result<String>;
}

pub struct OpenaiClient {
    client: Client<OpenAIConfig>,
    settings: GeneratorSettings,
}

impl OpenaiClient {
    pub fn new(api_key: String, settings: GeneratorSettings) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        OpenaiClient {
            client: Client::with_config(config),
            settings,
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenaiClient {
    async fn complete_json(&self, prompt: &str) -> anyhow::Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.settings.model.clone())
            .temperature(self.settings.temperature)
            .max_tokens(self.settings.max_tokens)
            .response_format(ResponseFormat::JsonObject)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_PROMPT)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()?
                    .into(),
            ])
            .build()?;

        let response = self.client.chat().create(request).await?;
        log::debug!("Response: {:?}", response);

        let first_choice = response
            .choices
            .first()
            .ok_or_else(|| anyhow!("No choices in Openai response"))?
            .message
            .content
            .clone()
            .ok_or_else(|| anyhow!("No content"))?;

        Ok(first_choice)
    }
}
