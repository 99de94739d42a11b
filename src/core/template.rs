//! Text templates for rendering log events
//!
//! A template is a string with `{field}` placeholders. Literal braces are
//! written `{{` and `}}`. A section between `{?field}` and `{/}` is only
//! rendered when `field` renders to a non-empty string.
//!
//! Built-in fields:
//!
//! | field | renders |
//! |-------|---------|
//! | `logger` | logger name |
//! | `level` | short level name (`WARN`) |
//! | `level_justified` | short level name padded to 5 columns |
//! | `level_name` | long level name (`warning`) |
//! | `level_value` | raw integer level |
//! | `message` | message text |
//! | `date`, `time`, `timestamp` | `2024/01/31`, `12:34:56`, ISO 8601 |
//! | `file`, `filepath`, `line` | call site, empty when not collected |
//! | `reset`, `bold`, `underline` | terminal attributes |
//! | `black` .. `white` | the eight basic foreground colors |
//! | `level_color` | color bucket of the event's level |
//!
//! Anything else must be registered as a helper in [`Helpers`] before the
//! template is parsed; unknown names are a syntax error.

use super::error::{LoggerError, Result};
use super::log_event::LogEvent;
use colored::Color;
use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

/// A render helper: computes a string from the event or fails with a reason
pub type HelperFn =
    Arc<dyn Fn(&LogEvent) -> std::result::Result<String, String> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Logger,
    Level,
    LevelJustified,
    LevelName,
    LevelValue,
    Message,
    Date,
    Time,
    Timestamp,
    File,
    FilePath,
    Line,
    Reset,
    Bold,
    Underline,
    Color(Color),
    LevelColor,
}

impl Field {
    fn lookup(name: &str) -> Option<Field> {
        let field = match name {
            "logger" => Field::Logger,
            "level" => Field::Level,
            "level_justified" => Field::LevelJustified,
            "level_name" => Field::LevelName,
            "level_value" => Field::LevelValue,
            "message" => Field::Message,
            "date" => Field::Date,
            "time" => Field::Time,
            "timestamp" => Field::Timestamp,
            "file" => Field::File,
            "filepath" => Field::FilePath,
            "line" => Field::Line,
            "reset" => Field::Reset,
            "bold" => Field::Bold,
            "underline" => Field::Underline,
            "black" => Field::Color(Color::Black),
            "red" => Field::Color(Color::Red),
            "green" => Field::Color(Color::Green),
            "yellow" => Field::Color(Color::Yellow),
            "blue" => Field::Color(Color::Blue),
            "magenta" => Field::Color(Color::Magenta),
            "cyan" => Field::Color(Color::Cyan),
            "white" => Field::Color(Color::White),
            "level_color" => Field::LevelColor,
            _ => return None,
        };
        Some(field)
    }

    fn write(self, event: &LogEvent, out: &mut String) -> fmt::Result {
        match self {
            Field::Logger => out.write_str(&event.logger_name),
            Field::Level => out.write_str(event.level.to_str()),
            Field::LevelJustified => write!(out, "{:<5}", event.level.to_str()),
            Field::LevelName => out.write_str(event.level.name()),
            Field::LevelValue => write!(out, "{}", event.level.value()),
            Field::Message => out.write_str(&event.message),
            Field::Date => write!(out, "{}", event.timestamp.format("%Y/%m/%d")),
            Field::Time => write!(out, "{}", event.timestamp.format("%H:%M:%S")),
            Field::Timestamp => out.write_str(&event.iso_timestamp()),
            Field::File => out.write_str(event.filename()),
            Field::FilePath => out.write_str(event.filepath()),
            Field::Line => match event.call_site {
                Some(site) => write!(out, "{}", site.line),
                None => Ok(()),
            },
            Field::Reset => out.write_str(LogEvent::reset()),
            Field::Bold => out.write_str(LogEvent::bold()),
            Field::Underline => out.write_str(LogEvent::underline()),
            Field::Color(color) => out.write_str(&LogEvent::color(color)),
            Field::LevelColor => out.write_str(&event.level_color()),
        }
    }
}

/// Closed set of extra named helpers a template may reference
#[derive(Clone, Default)]
pub struct Helpers {
    map: HashMap<String, HelperFn>,
}

impl Helpers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `helper` under `name`.
    ///
    /// Names must be `[a-z_][a-z0-9_]*` and may not shadow a built-in field.
    pub fn register<F>(&mut self, name: &str, helper: F) -> Result<()>
    where
        F: Fn(&LogEvent) -> std::result::Result<String, String> + Send + Sync + 'static,
    {
        let valid = name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !valid {
            return Err(LoggerError::config(
                "template helper",
                format!("invalid helper name '{}'", name),
            ));
        }
        if Field::lookup(name).is_some() {
            return Err(LoggerError::config(
                "template helper",
                format!("'{}' is a built-in field", name),
            ));
        }
        self.map.insert(name.to_string(), Arc::new(helper));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    fn get(&self, name: &str) -> Option<HelperFn> {
        self.map.get(name).cloned()
    }
}

impl fmt::Debug for Helpers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.map.keys().collect();
        names.sort();
        f.debug_struct("Helpers").field("names", &names).finish()
    }
}

enum Segment {
    Literal(String),
    Field(Field),
    Helper { name: String, helper: HelperFn },
    Conditional { test: Box<Segment>, body: Vec<Segment> },
}

impl Segment {
    fn render(&self, event: &LogEvent, out: &mut String) -> Result<()> {
        match self {
            Segment::Literal(text) => out.push_str(text),
            Segment::Field(field) => field
                .write(event, out)
                .map_err(|_| LoggerError::render("field", "formatter error"))?,
            Segment::Helper { name, helper } => {
                let value = helper(event).map_err(|reason| LoggerError::render(name, reason))?;
                out.push_str(&value);
            }
            Segment::Conditional { test, body } => {
                let mut probe = String::new();
                test.render(event, &mut probe)?;
                if !probe.is_empty() {
                    for segment in body {
                        segment.render(event, out)?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// A parsed, immutable render template
pub struct Template {
    name: String,
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse `source` using only the built-in fields
    pub fn parse(source: &str) -> Result<Self> {
        Self::parse_with("user", source, &Helpers::default())
    }

    /// Parse `source`, resolving extra names against `helpers`
    pub fn parse_with(name: &str, source: &str, helpers: &Helpers) -> Result<Self> {
        let segments = Parser::new(source, helpers).parse()?;
        Ok(Self {
            name: name.to_string(),
            source: source.to_string(),
            segments,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render `event`, appending to `out`
    pub fn render_into(&self, event: &LogEvent, out: &mut String) -> Result<()> {
        for segment in &self.segments {
            segment.render(event, out)?;
        }
        Ok(())
    }

    pub fn render(&self, event: &LogEvent) -> Result<String> {
        let mut out = String::with_capacity(self.source.len() + event.message.len());
        self.render_into(event, &mut out)?;
        Ok(out)
    }

    /// Date, time, colored level, logger, call site and message
    pub fn color() -> Arc<Template> {
        static T: OnceLock<Arc<Template>> = OnceLock::new();
        T.get_or_init(|| {
            builtin(
                "color",
                "{blue}{date} {time}{reset} \
                 {bold}{level_color}{level}{reset} \
                 {underline}{logger}{reset} \
                 {?file}{file}:{line} {/}- \
                 {level_color}{message}{reset}",
            )
        })
        .clone()
    }

    /// Same fields as [`Template::color`] without escapes
    pub fn standard() -> Arc<Template> {
        static T: OnceLock<Arc<Template>> = OnceLock::new();
        T.get_or_init(|| {
            builtin(
                "standard",
                "{date} {time} {level} {logger} {?file}{file}:{line} {/}- {message}",
            )
        })
        .clone()
    }

    /// No date or time, the syslog transport adds its own
    pub fn syslog() -> Arc<Template> {
        static T: OnceLock<Arc<Template>> = OnceLock::new();
        T.get_or_init(|| {
            builtin(
                "syslog",
                "{level} {logger} {?file}{file}:{line} {/}- {message}",
            )
        })
        .clone()
    }

    /// No date or time, the receiving logger adds its own
    pub fn stdlib() -> Arc<Template> {
        static T: OnceLock<Arc<Template>> = OnceLock::new();
        T.get_or_init(|| {
            builtin(
                "stdlib",
                "{level} {logger} {?file}{file}:{line} {/}- {message}",
            )
        })
        .clone()
    }
}

fn builtin(name: &str, source: &str) -> Arc<Template> {
    Arc::new(
        Template::parse_with(name, source, &Helpers::default())
            .expect("built-in template is valid"),
    )
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("name", &self.name)
            .field("source", &self.source)
            .finish()
    }
}

/// Named built-in templates, selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplatePreset {
    Color,
    Standard,
    Syslog,
    Stdlib,
}

impl TemplatePreset {
    pub fn template(self) -> Arc<Template> {
        match self {
            TemplatePreset::Color => Template::color(),
            TemplatePreset::Standard => Template::standard(),
            TemplatePreset::Syslog => Template::syslog(),
            TemplatePreset::Stdlib => Template::stdlib(),
        }
    }
}

impl FromStr for TemplatePreset {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "color" => Ok(TemplatePreset::Color),
            "standard" => Ok(TemplatePreset::Standard),
            "syslog" => Ok(TemplatePreset::Syslog),
            "stdlib" => Ok(TemplatePreset::Stdlib),
            _ => Err(LoggerError::config(
                "template",
                format!("unknown preset '{}'", s),
            )),
        }
    }
}

struct Frame {
    test: Segment,
    body: Vec<Segment>,
}

struct Parser<'a> {
    source: &'a str,
    helpers: &'a Helpers,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, helpers: &'a Helpers) -> Self {
        Self { source, helpers }
    }

    fn parse(&self) -> Result<Vec<Segment>> {
        let mut root: Vec<Segment> = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();
        let mut literal = String::new();
        let bytes = self.source.as_bytes();
        let mut pos = 0;

        while pos < bytes.len() {
            match bytes[pos] {
                b'{' if bytes.get(pos + 1) == Some(&b'{') => {
                    literal.push('{');
                    pos += 2;
                }
                b'}' if bytes.get(pos + 1) == Some(&b'}') => {
                    literal.push('}');
                    pos += 2;
                }
                b'}' => {
                    return Err(LoggerError::template_syntax(pos, "unmatched '}'"));
                }
                b'{' => {
                    let close = self.source[pos..]
                        .find('}')
                        .map(|i| pos + i)
                        .ok_or_else(|| LoggerError::template_syntax(pos, "unclosed '{'"))?;
                    let tag = self.source[pos + 1..close].trim();
                    flush_literal(&mut literal, current(&mut root, &mut stack));

                    if tag == "/" {
                        let frame = stack.pop().ok_or_else(|| {
                            LoggerError::template_syntax(pos, "'{/}' without an open section")
                        })?;
                        current(&mut root, &mut stack).push(Segment::Conditional {
                            test: Box::new(frame.test),
                            body: frame.body,
                        });
                    } else if let Some(name) = tag.strip_prefix('?') {
                        let test = self.resolve(name.trim(), pos)?;
                        stack.push(Frame {
                            test,
                            body: Vec::new(),
                        });
                    } else {
                        let segment = self.resolve(tag, pos)?;
                        current(&mut root, &mut stack).push(segment);
                    }
                    pos = close + 1;
                }
                _ => {
                    // advance one whole UTF-8 character
                    let ch = self.source[pos..]
                        .chars()
                        .next()
                        .ok_or_else(|| LoggerError::template_syntax(pos, "invalid text"))?;
                    literal.push(ch);
                    pos += ch.len_utf8();
                }
            }
        }

        if !stack.is_empty() {
            return Err(LoggerError::template_syntax(
                self.source.len(),
                "section opened with '{?..}' is never closed",
            ));
        }
        flush_literal(&mut literal, &mut root);
        Ok(root)
    }

    fn resolve(&self, name: &str, pos: usize) -> Result<Segment> {
        if name.is_empty() {
            return Err(LoggerError::template_syntax(pos, "empty placeholder"));
        }
        if let Some(field) = Field::lookup(name) {
            return Ok(Segment::Field(field));
        }
        match self.helpers.get(name) {
            Some(helper) => Ok(Segment::Helper {
                name: name.to_string(),
                helper,
            }),
            None => Err(LoggerError::template_syntax(
                pos,
                format!("unknown field '{}'", name),
            )),
        }
    }
}

fn current<'s>(root: &'s mut Vec<Segment>, stack: &'s mut [Frame]) -> &'s mut Vec<Segment> {
    match stack.last_mut() {
        Some(frame) => &mut frame.body,
        None => root,
    }
}

fn flush_literal(literal: &mut String, into: &mut Vec<Segment>) {
    if !literal.is_empty() {
        into.push(Segment::Literal(std::mem::take(literal)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CallSite, LogLevel};

    fn event(level: LogLevel, message: &str) -> LogEvent {
        LogEvent::new("app.net", level, message)
    }

    #[test]
    fn test_plain_fields() {
        let t = Template::parse("[{level_justified}] {logger}: {message}").unwrap();
        let out = t.render(&event(LogLevel::ERROR, "boom")).unwrap();
        assert_eq!(out, "[ERR  ] app.net: boom");
    }

    #[test]
    fn test_escaped_braces() {
        let t = Template::parse("{{{level}}}").unwrap();
        assert_eq!(t.render(&event(LogLevel::INFO, "")).unwrap(), "{INFO}");
    }

    #[test]
    fn test_conditional_section() {
        let t = Template::parse("{?file}{file}:{line} {/}- {message}").unwrap();
        let without = event(LogLevel::INFO, "hi");
        assert_eq!(t.render(&without).unwrap(), "- hi");

        let with = event(LogLevel::INFO, "hi").with_call_site(Some(CallSite::new("src/a/b.rs", 7)));
        assert_eq!(t.render(&with).unwrap(), "b.rs:7 - hi");
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(
            Template::parse("{message"),
            Err(LoggerError::TemplateSyntax { offset: 0, .. })
        ));
        assert!(Template::parse("oops }").is_err());
        assert!(Template::parse("{nope}").is_err());
        assert!(Template::parse("{?file}never closed").is_err());
        assert!(Template::parse("{/}").is_err());
        assert!(Template::parse("{}").is_err());
    }

    #[test]
    fn test_helpers_are_closed_set() {
        let mut helpers = Helpers::new();
        helpers
            .register("shout", |e| Ok(e.message.to_uppercase()))
            .unwrap();
        assert!(helpers.register("level", |_| Ok(String::new())).is_err());
        assert!(helpers.register("Bad-Name", |_| Ok(String::new())).is_err());

        let t = Template::parse_with("loud", "{shout}!", &helpers).unwrap();
        assert_eq!(t.render(&event(LogLevel::INFO, "hey")).unwrap(), "HEY!");
        assert!(Template::parse("{shout}").is_err());
    }

    #[test]
    fn test_helper_failure_is_render_error() {
        let mut helpers = Helpers::new();
        helpers
            .register("broken", |_| Err("no hostname".to_string()))
            .unwrap();
        let t = Template::parse_with("broken", "{broken} {message}", &helpers).unwrap();
        let err = t.render(&event(LogLevel::INFO, "x")).unwrap_err();
        assert!(matches!(err, LoggerError::RenderFailed { .. }));
        assert!(err.to_string().contains("no hostname"));
    }

    #[test]
    fn test_presets() {
        let e = event(LogLevel::WARNING, "careful")
            .with_call_site(Some(CallSite::new("src/x.rs", 3)));
        let syslog = Template::syslog().render(&e).unwrap();
        assert_eq!(syslog, "WARN app.net x.rs:3 - careful");

        let standard = Template::standard().render(&e).unwrap();
        assert!(standard.ends_with(" WARN app.net x.rs:3 - careful"));

        let color = Template::color().render(&e).unwrap();
        assert!(color.contains("\x1b[35mcareful\x1b[0m"));
        assert!(color.starts_with("\x1b[34m"));

        assert_eq!("Syslog".parse::<TemplatePreset>().unwrap(), TemplatePreset::Syslog);
        assert!("fancy".parse::<TemplatePreset>().is_err());
    }
}
