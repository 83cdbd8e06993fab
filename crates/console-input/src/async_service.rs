use crate::map_key_event;
use console_events::{Event, InputEvent};
use crossterm::event::{Event as CEvent, EventStream};
use std::io;
use std::sync::Arc;
use tokio::sync::{Notify, mpsc::Sender};
use tokio::task;
use tokio_stream::StreamExt;
use tracing::{Instrument, debug, info, trace};

#[derive(Clone, Debug)]
pub struct AsyncInputShutdown {
    notify: Arc<Notify>,
}

impl AsyncInputShutdown {
    pub fn signal(&self) {
        self.notify.notify_one();
    }
}

#[derive(Clone, Debug)]
struct ShutdownListener {
    notify: Arc<Notify>,
}

impl ShutdownListener {
    fn new_pair() -> (AsyncInputShutdown, Self) {
        let notify = Arc::new(Notify::new());
        (
            AsyncInputShutdown {
                notify: notify.clone(),
            },
            ShutdownListener { notify },
        )
    }

    async fn wait(&self) {
        self.notify.notified().await;
    }
}

pub(crate) fn spawn_async_event_task(
    sender: Sender<Event>,
) -> (task::JoinHandle<()>, AsyncInputShutdown) {
    let (shutdown, listener) = ShutdownListener::new_pair();
    let span = tracing::debug_span!(target: "input.task", "input_async_task");
    let handle = task::spawn(
        async move {
            AsyncEventStreamTask::new(sender, EventStream::new(), listener)
                .run()
                .await;
        }
        .instrument(span),
    );
    (handle, shutdown)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExitReason {
    ShutdownSignal,
    ChannelClosed,
    StreamEnded,
    StreamError,
}

impl ExitReason {
    fn as_str(&self) -> &'static str {
        match self {
            ExitReason::ShutdownSignal => "shutdown_signal",
            ExitReason::ChannelClosed => "channel_closed",
            ExitReason::StreamEnded => "stream_ended",
            ExitReason::StreamError => "stream_error",
        }
    }
}

struct AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    sender: Sender<Event>,
    stream: S,
    shutdown: ShutdownListener,
    exit_reason: ExitReason,
    stream_error: Option<io::ErrorKind>,
}

impl<S> AsyncEventStreamTask<S>
where
    S: tokio_stream::Stream<Item = io::Result<CEvent>> + Send + Unpin + 'static,
{
    fn new(sender: Sender<Event>, stream: S, shutdown: ShutdownListener) -> Self {
        Self {
            sender,
            stream,
            shutdown,
            exit_reason: ExitReason::StreamEnded,
            stream_error: None,
        }
    }

    async fn run(mut self) -> ExitReason {
        info!(target: "input.task", "async_input_task_started");
        loop {
            let maybe_result = tokio::select! {
                biased;
                _ = self.shutdown.wait() => {
                    self.exit_reason = ExitReason::ShutdownSignal;
                    break;
                }
                result = self.stream.next() => result,
            };

            let Some(result) = maybe_result else {
                break;
            };

            let mapped = match result {
                Ok(CEvent::Key(key)) => map_key_event(key),
                Ok(CEvent::Paste(data)) => {
                    trace!(target: "input.paste", len = data.len(), "paste");
                    Some(InputEvent::Paste(data))
                }
                Ok(CEvent::Resize(w, h)) => {
                    trace!(target: "input.event", w, h, "resize");
                    Some(InputEvent::Resize(w, h))
                }
                Ok(_) => None,
                Err(err) => {
                    self.exit_reason = ExitReason::StreamError;
                    self.stream_error = Some(err.kind());
                    break;
                }
            };

            if let Some(input) = mapped
                && self.sender.send(Event::Input(input)).await.is_err()
            {
                self.exit_reason = ExitReason::ChannelClosed;
                break;
            }
        }
        debug!(
            target: "input.task",
            reason = self.exit_reason.as_str(),
            error = ?self.stream_error,
            "async_input_task_stopped"
        );
        self.exit_reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_events::{KeyCode, KeyEvent};
    use crossterm::event::{KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyModifiers as CMods};
    use tokio::sync::mpsc;

    fn key(c: char) -> io::Result<CEvent> {
        Ok(CEvent::Key(CKeyEvent::new(CKeyCode::Char(c), CMods::NONE)))
    }

    #[tokio::test]
    async fn forwards_mapped_events_until_stream_ends() {
        let (tx, mut rx) = mpsc::channel(8);
        let (_shutdown, listener) = ShutdownListener::new_pair();
        let stream = tokio_stream::iter(vec![
            key('a'),
            Ok(CEvent::FocusGained),
            Ok(CEvent::Paste("pasted".into())),
            Ok(CEvent::Resize(80, 24)),
        ]);
        let reason = AsyncEventStreamTask::new(tx, stream, listener).run().await;
        assert_eq!(reason, ExitReason::StreamEnded);

        assert_eq!(
            rx.recv().await,
            Some(Event::Input(InputEvent::Key(KeyEvent::plain(KeyCode::Char('a')))))
        );
        assert_eq!(
            rx.recv().await,
            Some(Event::Input(InputEvent::Paste("pasted".into())))
        );
        assert_eq!(rx.recv().await, Some(Event::Input(InputEvent::Resize(80, 24))));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn stops_on_stream_error() {
        let (tx, _rx) = mpsc::channel(8);
        let (_shutdown, listener) = ShutdownListener::new_pair();
        let stream = tokio_stream::iter(vec![key('a'), Err(io::Error::other("boom")), key('b')]);
        let reason = AsyncEventStreamTask::new(tx, stream, listener).run().await;
        assert_eq!(reason, ExitReason::StreamError);
    }

    #[tokio::test]
    async fn stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let (_shutdown, listener) = ShutdownListener::new_pair();
        let stream = tokio_stream::iter(vec![key('x')]);
        let reason = AsyncEventStreamTask::new(tx, stream, listener).run().await;
        assert_eq!(reason, ExitReason::ChannelClosed);
    }

    #[tokio::test]
    async fn shutdown_signal_wins() {
        let (tx, _rx) = mpsc::channel(1);
        let (shutdown, listener) = ShutdownListener::new_pair();
        shutdown.signal();
        let stream = tokio_stream::pending::<io::Result<CEvent>>();
        let reason = AsyncEventStreamTask::new(tx, stream, listener).run().await;
        assert_eq!(reason, ExitReason::ShutdownSignal);
    }
}
