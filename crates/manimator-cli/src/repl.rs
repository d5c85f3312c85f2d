//! Interactive prompt loop
//!
//! Each line is an animation description. `exit`/`quit`, Ctrl+C and Ctrl+D
//! leave the loop; a failed request is reported and the loop keeps going.

use std::path::PathBuf;

use anyhow::Result;
use manimator_core::outcome::ToolReply;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, EditMode, Editor};
use tracing::error;

use crate::orchestrator::{LanguageModel, Orchestrator, SceneExecutor};

const PROMPT: &str = "describe> ";

/// What a line of input asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Exit,
    Empty,
    Describe(String),
}

/// Classify one line of input
pub fn classify_input(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
        Input::Exit
    } else if trimmed.is_empty() {
        Input::Empty
    } else {
        Input::Describe(trimmed.to_string())
    }
}

/// One-line summary of a tool reply for the user
pub fn describe_reply(reply: &ToolReply) -> String {
    match reply {
        ToolReply::Rendered(path) => format!("Animation saved at: {}", path.display()),
        ToolReply::NoArtifact(workspace) => format!(
            "Render finished but no video was found (workspace: {})",
            workspace.display()
        ),
        ToolReply::Failed(reason) => format!("Rendering failed: {reason}"),
    }
}

/// REPL state
pub struct Repl<M, E> {
    orchestrator: Orchestrator<M, E>,
    editor: Editor<(), DefaultHistory>,
    history_path: Option<PathBuf>,
}

impl<M: LanguageModel, E: SceneExecutor> Repl<M, E> {
    /// Create a new REPL around an orchestrator
    pub fn new(orchestrator: Orchestrator<M, E>) -> Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .auto_add_history(false)
            .edit_mode(EditMode::Emacs)
            .build();

        let mut editor = Editor::with_config(config)?;

        let history_path = history_path();
        if let Some(ref path) = history_path {
            let _ = editor.load_history(path);
        }

        Ok(Self {
            orchestrator,
            editor,
            history_path,
        })
    }

    /// Run the loop until exit, interrupt or end of input
    pub async fn run(&mut self) -> Result<()> {
        println!("\nReady to create animations! Type 'exit' to quit.");

        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => match classify_input(&line) {
                    Input::Exit => break,
                    Input::Empty => continue,
                    Input::Describe(description) => {
                        let _ = self.editor.add_history_entry(&description);
                        self.handle(&description).await;
                    }
                },
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = self.editor.save_history(path);
        }

        println!("\nGoodbye!");
        Ok(())
    }

    async fn handle(&self, description: &str) {
        println!("Generating Manim code and rendering...");

        match self.orchestrator.generate_and_execute(description).await {
            Ok(reply) => println!("{}", describe_reply(&reply)),
            Err(e) => {
                error!("Request failed: {}", e);
                println!("Error: {}", e);
            }
        }
    }

    /// Hand the orchestrator back (to shut its session down)
    pub fn into_orchestrator(self) -> Orchestrator<M, E> {
        self.orchestrator
    }
}

/// Get the history file path
fn history_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("manimator").join("history"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_tokens_case_insensitive() {
        assert_eq!(classify_input("exit"), Input::Exit);
        assert_eq!(classify_input("  QUIT \n"), Input::Exit);
        assert_eq!(classify_input("Exit"), Input::Exit);
    }

    #[test]
    fn test_empty_input_ignored() {
        assert_eq!(classify_input(""), Input::Empty);
        assert_eq!(classify_input("   \t"), Input::Empty);
    }

    #[test]
    fn test_description() {
        assert_eq!(
            classify_input(" a blue circle growing "),
            Input::Describe("a blue circle growing".into())
        );
        assert_eq!(classify_input("exit the circle"), Input::Describe("exit the circle".into()));
    }

    #[test]
    fn test_describe_reply_distinguishes_outcomes() {
        let ok = describe_reply(&ToolReply::Rendered(PathBuf::from("/ws/A.mp4")));
        assert_eq!(ok, "Animation saved at: /ws/A.mp4");

        let degraded = describe_reply(&ToolReply::NoArtifact(PathBuf::from("/ws")));
        assert!(degraded.contains("no video was found"));

        let failed = describe_reply(&ToolReply::Failed("no scene subclass found".into()));
        assert_eq!(failed, "Rendering failed: no scene subclass found");
    }
}
