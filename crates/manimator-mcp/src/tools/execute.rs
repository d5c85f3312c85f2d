//! Scene execution tool parameters

use schemars::JsonSchema;
use serde::Deserialize;

/// Request for executing a generated scene
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExecuteManimCodeRequest {
    /// Python source for a Manim animation.
    /// Must define exactly one class deriving from a `*Scene` base, e.g.
    ///
    /// ```python
    /// from manim import *
    ///
    /// class CircleGrow(Scene):
    ///     def construct(self):
    ///         self.play(GrowFromCenter(Circle(color=BLUE)))
    /// ```
    pub manim_code: String,
}
