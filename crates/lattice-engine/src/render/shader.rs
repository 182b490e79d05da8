//! WGSL shader programs.

use std::borrow::Cow;

/// Entry point every program must declare for its vertex stage.
pub const VERTEX_ENTRY: &str = "vs_main";
/// Entry point every program must declare for its fragment stage.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Shader failures. All of them are fatal for the renderer that hit them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShaderError {
    #[error("shader `{label}` has an empty source")]
    Empty { label: String },

    #[error("shader `{label}` does not declare entry point `{entry_point}`")]
    MissingEntryPoint {
        label: String,
        entry_point: &'static str,
    },
}

/// A compiled vertex + fragment module pair in one WGSL source.
#[derive(Debug)]
pub struct ShaderProgram {
    module: wgpu::ShaderModule,
}

impl ShaderProgram {
    /// Validates `source` and creates the shader module.
    ///
    /// WGSL syntax errors are reported by wgpu's device error handler, which
    /// terminates the process; this only rejects sources the pipelines could
    /// never use.
    pub fn new(device: &wgpu::Device, label: &str, source: &str) -> Result<Self, ShaderError> {
        validate_source(label, source)?;

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(Cow::Owned(source.to_string())),
        });
        log::debug!("shader `{label}` created");

        Ok(Self { module })
    }

    pub fn vertex_state<'a>(
        &'a self,
        buffers: &'a [wgpu::VertexBufferLayout<'a>],
    ) -> wgpu::VertexState<'a> {
        wgpu::VertexState {
            module: &self.module,
            entry_point: Some(VERTEX_ENTRY),
            compilation_options: Default::default(),
            buffers,
        }
    }

    pub fn fragment_state<'a>(
        &'a self,
        targets: &'a [Option<wgpu::ColorTargetState>],
    ) -> wgpu::FragmentState<'a> {
        wgpu::FragmentState {
            module: &self.module,
            entry_point: Some(FRAGMENT_ENTRY),
            compilation_options: Default::default(),
            targets,
        }
    }
}

/// Checks that `source` is non-empty and declares both entry points.
pub fn validate_source(label: &str, source: &str) -> Result<(), ShaderError> {
    if source.trim().is_empty() {
        return Err(ShaderError::Empty {
            label: label.to_string(),
        });
    }

    for entry_point in [VERTEX_ENTRY, FRAGMENT_ENTRY] {
        if !declares_entry_point(source, entry_point) {
            return Err(ShaderError::MissingEntryPoint {
                label: label.to_string(),
                entry_point,
            });
        }
    }
    Ok(())
}

/// Returns `true` if `source` contains a function declaration `fn <name>(`.
///
/// Whitespace between the tokens is allowed; `// line comments` are ignored.
pub fn declares_entry_point(source: &str, name: &str) -> bool {
    source
        .lines()
        .map(|line| line.split("//").next().unwrap_or(""))
        .any(|line| {
            let mut rest = line;
            while let Some(pos) = find_keyword(rest, "fn") {
                let after = rest[pos + 2..].trim_start();
                if let Some(tail) = after.strip_prefix(name) {
                    if tail.trim_start().starts_with('(') {
                        return true;
                    }
                }
                rest = &rest[pos + 2..];
            }
            false
        })
}

/// Finds `kw` as a standalone word.
fn find_keyword(haystack: &str, kw: &str) -> Option<usize> {
    let is_ident = |c: char| c.is_alphanumeric() || c == '_';
    haystack.match_indices(kw).map(|(i, _)| i).find(|&i| {
        let before_ok = haystack[..i].chars().next_back().is_none_or(|c| !is_ident(c));
        let after_ok = haystack[i + kw.len()..].chars().next().is_some_and(char::is_whitespace);
        before_ok && after_ok
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAT: &str = include_str!("shaders/flat.wgsl");
    const COLORED: &str = include_str!("shaders/colored.wgsl");
    const POINT: &str = include_str!("shaders/point.wgsl");

    #[test]
    fn bundled_shaders_validate() {
        for (label, src) in [("flat", FLAT), ("colored", COLORED), ("point", POINT)] {
            assert_eq!(validate_source(label, src), Ok(()), "{label}");
        }
    }

    #[test]
    fn empty_source_is_rejected() {
        assert_eq!(
            validate_source("x", "  \n"),
            Err(ShaderError::Empty { label: "x".into() })
        );
    }

    #[test]
    fn missing_fragment_entry_is_reported() {
        let src = "@vertex fn vs_main() -> @builtin(position) vec4<f32> { return vec4<f32>(); }";
        assert_eq!(
            validate_source("half", src),
            Err(ShaderError::MissingEntryPoint {
                label: "half".into(),
                entry_point: FRAGMENT_ENTRY,
            })
        );
    }

    #[test]
    fn entry_point_detection_tolerates_spacing() {
        assert!(declares_entry_point("fn   vs_main (x: f32)", "vs_main"));
        assert!(declares_entry_point("@vertex\nfn vs_main(", "vs_main"));
    }

    #[test]
    fn entry_point_detection_ignores_lookalikes() {
        assert!(!declares_entry_point("fn vs_main_helper()", "vs_main"));
        assert!(!declares_entry_point("// fn vs_main()", "vs_main"));
        assert!(!declares_entry_point("let defn vs_main()", "vs_main"));
        assert!(!declares_entry_point("call(vs_main)", "vs_main"));
    }

    #[test]
    fn error_messages_name_the_shader() {
        let err = ShaderError::MissingEntryPoint {
            label: "point".into(),
            entry_point: VERTEX_ENTRY,
        };
        assert_eq!(err.to_string(), "shader `point` does not declare entry point `vs_main`");
    }
}
