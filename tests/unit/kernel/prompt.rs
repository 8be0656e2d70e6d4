use super::*;
use std::sync::mpsc;

fn request(
    title: Option<&str>,
    variable_type: Option<&str>,
    callback: Callback<String>,
) -> PromptRequest {
    PromptRequest {
        message: "New variable name:".to_string(),
        default_value: String::new(),
        title: title.map(str::to_string),
        variable_type: variable_type.map(str::to_string),
        callback,
    }
}

#[test]
fn test_request_uses_default_title() {
    let mut prompt = PromptController::new();

    prompt.request(request(None, None, Callback::new(|_| {}))).unwrap();

    let active = prompt.active().unwrap();
    assert_eq!(active.title, VARIABLE_MODAL_TITLE);
    assert!(active.show_more_options);
    assert_eq!(prompt.revision(), 1);
}

#[test]
fn test_broadcast_prompt_hides_more_options() {
    let mut prompt = PromptController::new();

    prompt
        .request(request(
            Some("New Message"),
            Some(BROADCAST_MESSAGE_VARIABLE_TYPE),
            Callback::new(|_| {}),
        ))
        .unwrap();

    let active = prompt.active().unwrap();
    assert_eq!(active.title, "New Message");
    assert!(!active.show_more_options);
}

#[test]
fn test_second_request_is_rejected_and_first_kept() {
    let mut prompt = PromptController::new();
    prompt
        .request(request(Some("First"), None, Callback::new(|_| {})))
        .unwrap();

    let err = prompt
        .request(request(Some("Second"), None, Callback::new(|_| {})))
        .unwrap_err();

    assert!(matches!(err, SyncError::PromptAlreadyActive));
    assert_eq!(prompt.active().unwrap().title, "First");
    assert_eq!(prompt.revision(), 1);
}

#[test]
fn test_resolve_invokes_callback_once() {
    let (tx, rx) = mpsc::channel();
    let mut prompt = PromptController::new();
    prompt
        .request(request(
            None,
            None,
            Callback::new(move |value| tx.send(value).unwrap()),
        ))
        .unwrap();

    prompt.resolve("score".to_string()).unwrap();

    assert_eq!(rx.recv().unwrap(), "score");
    assert!(!prompt.is_awaiting());
    assert!(matches!(
        prompt.resolve("again".to_string()),
        Err(SyncError::PromptIdle)
    ));
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_cancel_drops_callback() {
    let (tx, rx) = mpsc::channel::<String>();
    let mut prompt = PromptController::new();
    prompt
        .request(request(
            None,
            None,
            Callback::new(move |value| tx.send(value).unwrap()),
        ))
        .unwrap();

    prompt.cancel().unwrap();

    assert!(prompt.active().is_none());
    assert_eq!(prompt.revision(), 2);
    assert!(rx.try_recv().is_err());
    assert!(matches!(prompt.cancel(), Err(SyncError::PromptIdle)));
}
