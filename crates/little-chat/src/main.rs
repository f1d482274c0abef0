//! A simple program to build a conversation and inspect the prompts it
//! produces, without talking to any model.

#[macro_use]
extern crate tracing;

use std::env;
use std::fmt::Display;
use std::io::Write as _;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;

use little_chat::SessionBuilder;
use little_chat::core::PromptBudget;
use little_chat::core::context::context_pair;
use little_chat::model::{
    ChatMessage, ContextFile, ContextMessage, Error, Speaker,
};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt, BufReader, Lines, Stdin};

const BAR_CHAR: &str = "▎";

const HELP: &str = "\
Type a message to add it to the conversation.

  /attach <path>  use a file as context for the next message
  /reply <text>   answer the latest message as the assistant
  /prompt         print the prompt for the next completion
  /chat           print the conversation
  /reset          start a new conversation
  /quit           exit";

enum Command {
    Message(String),
    Attach(PathBuf),
    Reply(String),
    Prompt,
    Chat,
    Reset,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let Some(command) = line.strip_prefix('/') else {
            return Command::Message(line.to_owned());
        };
        let (name, arg) = command
            .split_once(' ')
            .map(|(name, arg)| (name, arg.trim()))
            .unwrap_or((command, ""));
        match name {
            "attach" if !arg.is_empty() => Command::Attach(arg.into()),
            "reply" if !arg.is_empty() => Command::Reply(arg.to_owned()),
            "prompt" => Command::Prompt,
            "chat" => Command::Chat,
            "reset" => Command::Reset,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(line.to_owned()),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let budget = budget_from_env();
    debug!("using budget: {budget:?}");
    let mut session = SessionBuilder::new().with_budget(budget).build();
    let mut attachments: Vec<PathBuf> = vec![];
    let mut lines = BufReader::new(io::stdin()).lines();

    println!("{HELP}\n");

    loop {
        print!("> ");
        std::io::stdout().flush().unwrap();

        let Some(line) = read_line(&mut lines).await else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match Command::parse(line) {
            Command::Message(text) => {
                if attachments.is_empty() {
                    session.send_message(&text, vec![]);
                } else {
                    let paths = std::mem::take(&mut attachments);
                    session.send_message_with_deferred_context(
                        &text,
                        read_attachments(paths),
                    );
                }
            }
            Command::Attach(path) => {
                println!("{} {}", "attached".bright_black(), path.display());
                attachments.push(path);
            }
            Command::Reply(text) => {
                if session.transcript().is_empty() {
                    eprintln!("nothing to reply to");
                }
                session.add_assistant_response(&text);
            }
            Command::Prompt => match session.prompt().await {
                Ok(prompt) => {
                    let budget = session.transcript().budget();
                    match serde_json::to_string_pretty(&prompt) {
                        Ok(json) => println!("{json}"),
                        Err(err) => error!("failed to serialize: {err}"),
                    }
                    println!(
                        "{}",
                        format!(
                            "{} messages, ~{} of {} tokens",
                            prompt.len(),
                            budget.estimate_all(&prompt),
                            budget.max_prompt_length()
                        )
                        .bright_black()
                    );
                }
                Err(err) => {
                    eprintln!("{} {err}", "failed to build prompt:".red());
                }
            },
            Command::Chat => {
                for msg in session.chat() {
                    print_chat_message(&msg);
                }
            }
            Command::Reset => {
                session.reset();
                attachments.clear();
                println!("{}", "started a new conversation".bright_black());
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Unknown(line) => {
                eprintln!("unknown command: {line}, try /help");
            }
        }
    }
}

async fn read_attachments(
    paths: Vec<PathBuf>,
) -> Result<Vec<ContextMessage>, Error> {
    let mut context = vec![];
    for path in paths {
        let content = tokio::fs::read_to_string(&path).await.map_err(|err| {
            Error::context_unavailable()
                .with_reason(format!("{}: {err}", path.display()))
        })?;
        trace!("read {} bytes from {}", content.len(), path.display());
        let file = ContextFile::new(path.display().to_string());
        context.extend(context_pair(file, &content));
    }
    Ok(context)
}

fn print_chat_message(msg: &ChatMessage) {
    match msg.speaker {
        Speaker::Human => {
            println!(
                "{}🧑 {} {}",
                BAR_CHAR.bright_green(),
                msg.display_text.bright_white(),
                msg.timestamp.bright_black()
            );
            for file in &msg.context_files {
                println!("{} 📄 {}", BAR_CHAR.bright_green(), file.file_name);
            }
        }
        Speaker::Assistant => {
            println!(
                "{}🤖 {} {}",
                BAR_CHAR.bright_cyan(),
                msg.display_text.bright_white(),
                msg.timestamp.bright_black()
            );
        }
    }
}

async fn read_line(lines: &mut Lines<BufReader<Stdin>>) -> Option<String> {
    match lines.next_line().await {
        Ok(line) => line,
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}

fn budget_from_env() -> PromptBudget {
    let mut builder = PromptBudget::builder();
    if let Some(tokens) = env_value::<usize>("LITTLE_CHAT_MAX_PROMPT_TOKENS") {
        builder = builder.with_max_prompt_length(tokens);
    }
    if let Some(chars) =
        env_value::<NonZeroUsize>("LITTLE_CHAT_CHARS_PER_TOKEN")
    {
        builder = builder.with_chars_per_token(chars);
    }
    builder.build()
}

fn env_value<T>(key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    let value = env::var(key).ok()?;
    match value.parse() {
        Ok(value) => Some(value),
        Err(err) => {
            eprintln!("ignoring {key}={value}: {err}");
            None
        }
    }
}
