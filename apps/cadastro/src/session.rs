//! Line-oriented interactive session over stdin/stdout.

use std::{
    io::{self, Write},
    sync::Arc,
};

use anyhow::Context;
use async_trait::async_trait;
use client_core::{Confirmation, RegistryController};
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader, Lines},
    sync::Mutex,
};

use crate::{
    controller::{
        commands::parse_command,
        events::spawn_event_printer,
        orchestration::{dispatch_command, Flow},
    },
    ui::render::{render_screen, LOADING_MESSAGE},
};

const PROMPT: &str = "cadastro> ";

/// Terminal lines shared by the prompt loop and confirmation prompts.
pub struct TerminalInput {
    lines: Mutex<Lines<BufReader<Box<dyn AsyncRead + Send + Unpin>>>>,
}

impl TerminalInput {
    pub fn new() -> Arc<Self> {
        Self::from_reader(tokio::io::stdin())
    }

    pub fn from_reader(reader: impl AsyncRead + Send + Unpin + 'static) -> Arc<Self> {
        let reader: Box<dyn AsyncRead + Send + Unpin> = Box::new(reader);
        Arc::new(Self {
            lines: Mutex::new(BufReader::new(reader).lines()),
        })
    }

    /// `None` at end of input.
    pub async fn next_line(&self) -> io::Result<Option<String>> {
        self.lines.lock().await.next_line().await
    }
}

/// Reads a yes/no answer from the terminal. Anything but an explicit yes
/// declines, including EOF.
pub struct StdinConfirmation {
    input: Arc<TerminalInput>,
}

impl StdinConfirmation {
    pub fn new(input: Arc<TerminalInput>) -> Self {
        Self { input }
    }
}

#[async_trait]
impl Confirmation for StdinConfirmation {
    async fn confirm(&self, prompt: &str) -> bool {
        print!("{prompt} [s/N] ");
        let _ = io::stdout().flush();
        match self.input.next_line().await {
            Ok(Some(answer)) => is_affirmative(&answer),
            Ok(None) | Err(_) => false,
        }
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "sim" | "y" | "yes"
    )
}

pub async fn run(
    controller: Arc<RegistryController>,
    input: Arc<TerminalInput>,
) -> anyhow::Result<()> {
    let printer = spawn_event_printer(controller.subscribe_events());

    println!("{LOADING_MESSAGE}");
    controller.start().await;
    println!("{}", render_screen(&controller.snapshot().await));
    println!("Digite 'ajuda' para ver os comandos.");

    loop {
        print!("{PROMPT}");
        io::stdout().flush().context("failed to flush stdout")?;

        let Some(line) = input
            .next_line()
            .await
            .context("failed to read from stdin")?
        else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        let mut status = String::new();
        let flow = dispatch_command(&controller, command, &mut status).await;
        if !status.is_empty() {
            println!("{status}");
        }
        match flow {
            Flow::Quit => break,
            Flow::Continue { redraw: true } => {
                println!("{}", render_screen(&controller.snapshot().await));
            }
            Flow::Continue { redraw: false } => {}
        }
    }

    printer.abort();
    Ok(())
}
