use futures::StreamExt;
use relay_context::ContentPart;
use relay_context::ModelMessage;
use relay_protocol::MessageRole;
use tokio_util::sync::CancellationToken;

use super::*;

#[tokio::test]
async fn echoes_the_last_user_message() {
    let provider = PassthroughProvider;
    let prompt = vec![ModelMessage::new(MessageRole::User, vec![ContentPart::text("say hello")])];
    let mut stream = provider
        .open_completion(
            &ProviderConfig::new(),
            PASSTHROUGH_MODEL_ID,
            &prompt,
            &[],
            &CompletionOptions::default(),
            CancellationToken::new(),
        )
        .await
        .unwrap();

    let mut text = String::new();
    let mut saw_finish = false;
    while let Some(event) = stream.next().await {
        match event {
            ProviderStreamEvent::TextDelta { text: delta } => text.push_str(&delta),
            ProviderStreamEvent::Finish { .. } => saw_finish = true,
            _ => {}
        }
    }
    assert!(text.contains("say hello"));
    assert!(saw_finish);
}

#[tokio::test]
async fn fetch_models_reports_the_single_echo_model() {
    let provider = PassthroughProvider;
    let models = provider.fetch_models(&ProviderConfig::new()).await.unwrap();
    assert_eq!(models.len(), 1);
    assert_eq!(models[0].id, PASSTHROUGH_MODEL_ID);
}
