//! Generation orchestrator
//!
//! One request = one model call followed by one tool call. The model is told
//! about the tool host's tools, but execution is always driven from here.

use async_trait::async_trait;
use manimator_core::outcome::ToolReply;
use manimator_core::scene::GeneratedScene;
use manimator_core::schema::FunctionDeclaration;
use manimator_core::{Error, Result};
use tracing::{info, warn};

/// What the model sent back for one prompt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelReply {
    /// Concatenated text parts, if any
    pub text: Option<String>,
    /// Names of functions the model asked to call
    pub function_calls: Vec<String>,
}

impl ModelReply {
    /// Reply holding only text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            function_calls: Vec::new(),
        }
    }
}

/// A generative model backend
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send one user prompt together with the callable function declarations
    async fn generate(&self, prompt: &str, declarations: &[FunctionDeclaration]) -> Result<ModelReply>;
}

/// Something that can run scene code across the tool boundary
#[async_trait]
pub trait SceneExecutor: Send + Sync {
    /// Run `execute_manim_code` and return its raw reply
    async fn execute(&self, code: &str) -> Result<String>;

    /// Run `cleanup_manim_temp_dir` and return its raw reply
    async fn cleanup(&self, directory: &str) -> Result<String>;
}

/// Instruction sent to the model for a description
pub fn scene_prompt(description: &str) -> String {
    format!(
        "You are an expert in Manim.\n\
         Generate Python code for the following animation:\n\
         - The code must start with `from manim import *`\n\
         - Define exactly one Scene subclass\n\
         - No explanation, no markdown, just clean executable code.\n\
         Description: {}",
        description.trim()
    )
}

/// Turns descriptions into rendered scenes
pub struct Orchestrator<M, E> {
    model: M,
    executor: E,
    declarations: Vec<FunctionDeclaration>,
}

impl<M: LanguageModel, E: SceneExecutor> Orchestrator<M, E> {
    /// Create an orchestrator; `declarations` come from the tool host's tools
    pub fn new(model: M, executor: E, declarations: Vec<FunctionDeclaration>) -> Self {
        Self {
            model,
            executor,
            declarations,
        }
    }

    /// Function declarations offered to the model
    pub fn declarations(&self) -> &[FunctionDeclaration] {
        &self.declarations
    }

    /// The executor (tool host session)
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Ask the model for one scene; nothing is cached between calls
    pub async fn request_scene(&self, description: &str) -> Result<GeneratedScene> {
        let prompt = scene_prompt(description);
        let reply = self.model.generate(&prompt, &self.declarations).await?;

        if !reply.function_calls.is_empty() {
            warn!(
                "Model requested tool calls {:?}; using its text instead",
                reply.function_calls
            );
        }

        let text = reply
            .text
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::Generation("model returned no text".to_string()))?;

        let scene = GeneratedScene::from_model_output(&text);
        if scene.raw_text.is_empty() {
            return Err(Error::Generation("model returned only code fences".to_string()));
        }

        info!("Generated {} bytes of scene code", scene.raw_text.len());
        Ok(scene)
    }

    /// Generate a scene and execute it through the tool host
    pub async fn generate_and_execute(&self, description: &str) -> Result<ToolReply> {
        let scene = self.request_scene(description).await?;
        let reply = self.executor.execute(&scene.raw_text).await?;
        Ok(ToolReply::parse(&reply))
    }

    /// Split back into model and executor
    pub fn into_parts(self) -> (M, E) {
        (self.model, self.executor)
    }
}
