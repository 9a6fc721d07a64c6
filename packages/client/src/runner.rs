//! Client session: handshake, printing received lines and sending input.

use std::sync::Arc;

use hiroba_server::domain::{MessageContent, MessageRepository, UserId, Username};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::{
    io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader},
    net::TcpStream,
    sync::mpsc,
};

use crate::{
    command::Command,
    config::ClientConfig,
    error::ClientError,
    line::{ReceivedLine, classify_line, format_chat_line, render},
};

/// Connect, send the display name and run until `/quit`, EOF or disconnect.
///
/// # Errors
///
/// Fails if the name is blank, the server is unreachable, or a write to the
/// server fails.
pub async fn run_client(
    config: ClientConfig,
    repository: Arc<dyn MessageRepository>,
) -> Result<(), ClientError> {
    let username = Username::new(config.name.clone())?;

    let stream = TcpStream::connect((config.host(), config.port()))
        .await
        .map_err(|source| ClientError::Connect {
            addr: config.server_address(),
            source,
        })?;
    tracing::info!("Connected to {}", config.server_address());

    let (read_half, mut write_half) = stream.into_split();

    // Handshake: the display name is the first line
    write_line(&mut write_half, username.as_str()).await?;
    let user_id = repository.register_user(username.clone()).await;

    print_history(repository.as_ref()).await;

    let mut reader = tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => println!("{}", render(&classify_line(&line))),
                Ok(None) => {
                    println!("{}", render(&ReceivedLine::Notice("Disconnected from server".to_string())));
                    break;
                }
                Err(e) => {
                    tracing::warn!("Error reading from server: {}", e);
                    break;
                }
            }
        }
    });

    let mut input = spawn_input();
    println!(
        "Connected as {}. Type /history to show stored messages, /quit to exit.",
        username
    );

    loop {
        tokio::select! {
            _ = &mut reader => break,
            event = input.recv() => match event.map(|text| Command::parse(&text)) {
                Some(Command::Say(text)) => {
                    send_chat(&mut write_half, repository.as_ref(), user_id, &username, &text).await?;
                }
                Some(Command::History) => print_history(repository.as_ref()).await,
                Some(Command::Empty) => {}
                Some(Command::Quit) | None => break,
            },
        }
    }

    if let Err(e) = write_half.shutdown().await {
        tracing::debug!("Error closing connection: {}", e);
    }
    reader.abort();
    Ok(())
}

/// Store a chat message, then send it as `"<name>: <text>"`.
///
/// Returns `false` without sending when the message could not be stored.
pub async fn send_chat<W>(
    writer: &mut W,
    repository: &dyn MessageRepository,
    user_id: UserId,
    username: &Username,
    text: &str,
) -> Result<bool, ClientError>
where
    W: AsyncWrite + Unpin,
{
    let text = text.trim();
    let Ok(content) = MessageContent::new(text.to_string()) else {
        return Ok(false);
    };

    if let Err(e) = repository.store_message(user_id, content).await {
        tracing::error!("Error saving message: {}", e);
        println!("{}", render(&ReceivedLine::Notice("Failed to save message".to_string())));
        return Ok(false);
    }

    let line = format_chat_line(username.as_str(), text);
    write_line(writer, &line).await?;
    println!("{}", render(&classify_line(&line)));
    Ok(true)
}

async fn write_line<W>(writer: &mut W, line: &str) -> Result<(), ClientError>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(format!("{}\n", line).as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

async fn print_history(repository: &dyn MessageRepository) {
    for message in repository.load_messages().await {
        println!(
            "{}",
            render(&ReceivedLine::Chat {
                sender: message.sender_name.to_string(),
                text: message.text.into_string(),
            })
        );
    }
}

/// Read input lines on a blocking thread; the channel closes on EOF or Ctrl+C.
fn spawn_input() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    // A detached thread so a pending readline never blocks runtime shutdown
    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                tracing::error!("Failed to initialize line editor: {}", e);
                return;
            }
        };
        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => {
                    tracing::error!("Input error: {}", e);
                    break;
                }
            }
        }
    });
    rx
}
