//! Runs producer requests in the background.
//!
//! At most one request is of interest at a time. Every message a request
//! emits carries its id; once a newer request starts or the current one is
//! cancelled, messages from the old id are rejected by [`Generator::is_current`].

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::data::validate_questions;
use crate::models::Question;
use crate::producer::{DEFAULT_TITLE, Document, GenerationUpdate, QuestionProducer};

/// Number of questions a full quiz is expected to have.
pub const DEFAULT_EXPECTED_QUESTIONS: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationEvent {
    Progress(usize),
    Completed(Vec<Question>),
    Failed(String),
    Title(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationMessage {
    pub request_id: Uuid,
    pub event: GenerationEvent,
}

struct ActiveRequest {
    id: Uuid,
    questions_pending: bool,
    tasks: Vec<JoinHandle<()>>,
}

pub struct Generator {
    producer: Arc<dyn QuestionProducer>,
    expected_questions: usize,
    active: Option<ActiveRequest>,
}

impl Generator {
    pub fn new(producer: Arc<dyn QuestionProducer>, expected_questions: usize) -> Self {
        Self {
            producer,
            expected_questions: expected_questions.max(1),
            active: None,
        }
    }

    /// Abandon any outstanding request and start a new one for `document`.
    pub fn start<T>(&mut self, document: Document, sender: mpsc::UnboundedSender<T>) -> Uuid
    where
        T: From<GenerationMessage> + Send + 'static,
    {
        self.cancel();

        let request_id = Uuid::new_v4();
        log::info!("generation {} started for {}", request_id, document.name());

        let title_task = {
            let producer = Arc::clone(&self.producer);
            let sender = sender.clone();
            let document = document.clone();
            tokio::spawn(async move {
                let title = match producer.title(&document).await {
                    Ok(title) if !title.trim().is_empty() => title,
                    Ok(_) => DEFAULT_TITLE.to_string(),
                    Err(err) => {
                        log::warn!("title for {} unavailable: {}", request_id, err);
                        DEFAULT_TITLE.to_string()
                    }
                };
                let _ = send(&sender, request_id, GenerationEvent::Title(title));
            })
        };

        let questions_task = {
            let producer = Arc::clone(&self.producer);
            tokio::spawn(async move {
                let mut updates = producer.generate(document);
                while let Some(update) = updates.next().await {
                    let (event, done) = match update {
                        Ok(GenerationUpdate::Partial(count)) => (GenerationEvent::Progress(count), false),
                        Ok(GenerationUpdate::Complete(questions)) => match validate_questions(&questions) {
                            Ok(()) => (GenerationEvent::Completed(questions), true),
                            Err(err) => (GenerationEvent::Failed(err.to_string()), true),
                        },
                        Err(err) => (GenerationEvent::Failed(err.to_string()), true),
                    };

                    if send(&sender, request_id, event).is_err() || done {
                        return;
                    }
                }

                let _ = send(
                    &sender,
                    request_id,
                    GenerationEvent::Failed("producer finished without a question list".to_string()),
                );
            })
        };

        self.active = Some(ActiveRequest {
            id: request_id,
            questions_pending: true,
            tasks: vec![questions_task, title_task],
        });

        request_id
    }

    pub fn cancel(&mut self) {
        if let Some(active) = self.active.take() {
            log::info!("generation {} abandoned", active.id);
            for task in active.tasks {
                task.abort();
            }
        }
    }

    pub fn is_current(&self, request_id: Uuid) -> bool {
        self.active.as_ref().is_some_and(|active| active.id == request_id)
    }

    /// Whether the current request still owes its question list.
    pub fn is_busy(&self) -> bool {
        self.active.as_ref().is_some_and(|active| active.questions_pending)
    }

    /// Record that `request_id` delivered its final question list or failed.
    /// Its title may still arrive afterwards.
    pub fn finish(&mut self, request_id: Uuid) {
        if let Some(active) = self.active.as_mut().filter(|active| active.id == request_id) {
            active.questions_pending = false;
        }
    }

    pub fn progress_percent(&self, produced: usize) -> u16 {
        ((produced * 100) / self.expected_questions).min(100) as u16
    }
}

impl Drop for Generator {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn send<T>(
    sender: &mpsc::UnboundedSender<T>,
    request_id: Uuid,
    event: GenerationEvent,
) -> Result<(), mpsc::error::SendError<T>>
where
    T: From<GenerationMessage>,
{
    sender.send(GenerationMessage { request_id, event }.into())
}

#[cfg(test)]
pub(crate) mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use futures_util::stream;

    use super::*;
    use crate::models::Label;
    use crate::producer::{GenerationStream, ProducerError};

    /// Producer that replays a fixed script, optionally after a delay.
    pub(crate) struct ScriptedProducer {
        pub(crate) script: Vec<Result<GenerationUpdate, String>>,
        pub(crate) delay: Duration,
        pub(crate) title: Result<String, String>,
    }

    impl ScriptedProducer {
        pub(crate) fn completing(questions: Vec<Question>) -> Self {
            let count = questions.len();
            Self {
                script: vec![
                    Ok(GenerationUpdate::Partial(count)),
                    Ok(GenerationUpdate::Complete(questions)),
                ],
                delay: Duration::ZERO,
                title: Ok("Scripted Quiz".to_string()),
            }
        }

        pub(crate) fn failing(reason: &str) -> Self {
            Self {
                script: vec![Err(reason.to_string())],
                delay: Duration::ZERO,
                title: Err(reason.to_string()),
            }
        }

        pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl QuestionProducer for ScriptedProducer {
        fn generate(&self, _document: Document) -> GenerationStream {
            let delay = self.delay;
            let script = self.script.clone();

            stream::once(async move { tokio::time::sleep(delay).await })
                .flat_map(move |_| {
                    stream::iter(
                        script
                            .clone()
                            .into_iter()
                            .map(|step| step.map_err(ProducerError::Unavailable)),
                    )
                })
                .boxed()
        }

        async fn title(&self, _document: &Document) -> Result<String, ProducerError> {
            self.title.clone().map_err(ProducerError::Unavailable)
        }
    }

    pub(crate) fn questions(count: usize) -> Vec<Question> {
        (0..count)
            .map(|i| Question::new(format!("Question {i}"), ["a", "b", "c", "d"], Label::B))
            .collect()
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<GenerationMessage>) -> Vec<GenerationMessage> {
        let mut messages = Vec::new();
        while let Ok(message) = rx.try_recv() {
            messages.push(message);
        }
        messages
    }

    #[tokio::test(start_paused = true)]
    async fn test_forwards_progress_completion_and_title() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut generator = Generator::new(Arc::new(ScriptedProducer::completing(questions(2))), 30);

        let id = generator.start(Document::new("a.pdf", Vec::new()), tx);
        assert!(generator.is_current(id));
        assert!(generator.is_busy());

        tokio::time::sleep(Duration::from_millis(10)).await;
        let events: Vec<_> = drain(&mut rx)
            .into_iter()
            .inspect(|message| assert_eq!(message.request_id, id))
            .map(|message| message.event)
            .collect();

        assert!(events.contains(&GenerationEvent::Progress(2)));
        assert!(events.contains(&GenerationEvent::Completed(questions(2))));
        assert!(events.contains(&GenerationEvent::Title("Scripted Quiz".to_string())));

        generator.finish(id);
        assert!(!generator.is_busy());
        assert!(generator.is_current(id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_and_title_fallback() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut generator = Generator::new(Arc::new(ScriptedProducer::failing("quota")), 30);
        generator.start(Document::new("a.pdf", Vec::new()), tx);

        tokio::time::sleep(Duration::from_millis(10)).await;
        let events: Vec<_> = drain(&mut rx).into_iter().map(|message| message.event).collect();

        assert!(events.contains(&GenerationEvent::Failed("producer unavailable: quota".to_string())));
        assert!(events.contains(&GenerationEvent::Title(DEFAULT_TITLE.to_string())));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_final_list_fails() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut generator = Generator::new(Arc::new(ScriptedProducer::completing(Vec::new())), 30);
        generator.start(Document::new("a.pdf", Vec::new()), tx);

        tokio::time::sleep(Duration::from_millis(10)).await;
        let events: Vec<_> = drain(&mut rx).into_iter().map(|message| message.event).collect();
        assert!(events.contains(&GenerationEvent::Failed("question list is empty".to_string())));
        assert!(!events.iter().any(|event| matches!(event, GenerationEvent::Completed(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_without_final_list_fails() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let producer = ScriptedProducer {
            script: vec![Ok(GenerationUpdate::Partial(1))],
            delay: Duration::ZERO,
            title: Ok("t".to_string()),
        };
        let mut generator = Generator::new(Arc::new(producer), 30);
        generator.start(Document::new("a.pdf", Vec::new()), tx);

        tokio::time::sleep(Duration::from_millis(10)).await;
        let events: Vec<_> = drain(&mut rx).into_iter().map(|message| message.event).collect();
        assert_eq!(
            events.iter().filter(|event| matches!(event, GenerationEvent::Failed(_))).count(),
            1
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_request_abandons_previous_one() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let producer = ScriptedProducer::completing(questions(3)).with_delay(Duration::from_secs(5));
        let mut generator = Generator::new(Arc::new(producer), 30);

        let first = generator.start(Document::new("a.pdf", Vec::new()), tx.clone());
        tokio::time::sleep(Duration::from_secs(1)).await;
        let second = generator.start(Document::new("a.pdf", Vec::new()), tx);

        assert!(!generator.is_current(first));
        assert!(generator.is_current(second));

        tokio::time::sleep(Duration::from_secs(10)).await;
        let messages = drain(&mut rx);
        assert!(
            messages
                .iter()
                .filter(|message| matches!(message.event, GenerationEvent::Completed(_)))
                .all(|message| message.request_id == second)
        );
        assert!(
            messages
                .iter()
                .any(|message| matches!(message.event, GenerationEvent::Completed(_)))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_forgets_request() {
        let (tx, mut rx) = mpsc::unbounded_channel::<GenerationMessage>();
        let producer = ScriptedProducer::completing(questions(1)).with_delay(Duration::from_secs(5));
        let mut generator = Generator::new(Arc::new(producer), 30);

        let id = generator.start(Document::new("a.pdf", Vec::new()), tx);
        generator.cancel();
        assert!(!generator.is_current(id));
        assert!(!generator.is_busy());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(
            drain(&mut rx)
                .iter()
                .all(|message| !matches!(message.event, GenerationEvent::Completed(_)))
        );
    }

    #[test]
    fn test_progress_percent_is_clamped() {
        let generator = Generator::new(Arc::new(ScriptedProducer::completing(Vec::new())), 30);
        assert_eq!(generator.progress_percent(0), 0);
        assert_eq!(generator.progress_percent(15), 50);
        assert_eq!(generator.progress_percent(45), 100);
    }
}
