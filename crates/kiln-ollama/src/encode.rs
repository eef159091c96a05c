use crate::error::{OllamaError, Result};
use crate::options::GenerationConfig;
use crate::types::{ChatMessage, ChatRequest};

/// Build the chat request for a single-turn prompt
///
/// `model` is the already-resolved name; the model in `config` is not
/// consulted here.
pub fn encode_request(prompt: &str, model: &str, config: &GenerationConfig<'_>) -> ChatRequest {
    ChatRequest {
        model: model.to_owned(),
        messages: vec![ChatMessage::user(prompt)],
        stream: config.stream,
        options: config.options.clone(),
    }
}

/// Serialize a chat request into a JSON body
pub(crate) fn to_body(request: &ChatRequest) -> Result<Vec<u8>> {
    serde_json::to_vec(request).map_err(OllamaError::RequestBuild)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::SamplingOptions;

    fn body_string(request: &ChatRequest) -> String {
        String::from_utf8(to_body(request).unwrap()).unwrap()
    }

    #[test]
    fn minimal_request_has_no_options() {
        let config = GenerationConfig::new("llama3");
        let request = encode_request("Say hi", "llama3", &config);

        insta::assert_snapshot!(
            body_string(&request),
            @r#"{"model":"llama3","messages":[{"role":"user","content":"Say hi"}],"stream":false}"#
        );
    }

    #[test]
    fn set_options_are_top_level() {
        let config = GenerationConfig::new("llama3").streaming(true).with_options(SamplingOptions {
            temperature: Some(0.0),
            seed: Some(42),
            stop: vec!["\n\n".to_owned()],
            ..SamplingOptions::default()
        });
        let request = encode_request("Q", "llama3", &config);

        insta::assert_snapshot!(
            body_string(&request),
            @r#"{"model":"llama3","messages":[{"role":"user","content":"Q"}],"stream":true,"temperature":0.0,"seed":42,"stop":["\n\n"]}"#
        );
    }

    #[test]
    fn empty_stop_list_is_omitted() {
        let config = GenerationConfig::new("m").with_options(SamplingOptions {
            stop: Vec::new(),
            ..SamplingOptions::default()
        });
        let body = body_string(&encode_request("p", "m", &config));
        assert!(!body.contains("stop"));
    }

    #[test]
    fn resolved_model_overrides_config() {
        let config = GenerationConfig::new("ollama");
        let request = encode_request("p", "mistral:7b", &config);
        assert_eq!(request.model, "mistral:7b");
    }

    #[test]
    fn prompt_is_sent_verbatim() {
        let prompt = "  line one\n\"quoted\"\t\u{1F600}  ";
        let request = encode_request(prompt, "m", &GenerationConfig::default());
        let value: serde_json::Value = serde_json::from_slice(&to_body(&request).unwrap()).unwrap();
        assert_eq!(value["messages"][0]["content"], prompt);
        assert_eq!(value["messages"][0]["role"], "user");
    }
}
