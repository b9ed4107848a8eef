#![forbid(unsafe_code)]

//! Typing effect for the hero heading.
//!
//! Replays an HTML string one visible character at a time. Markup is
//! buffered until its closing `>` and emitted whole with no delay. Tags that
//! are still open are closed in every emitted frame, so partially typed
//! highlight text renders inside its element.

use std::time::Duration;

use tracing::debug;

use super::EffectTask;
use crate::config::PageConfig;
use crate::controller::Cx;
use crate::patch::{DomPatch, ElementRef};

const VOID_ELEMENTS: [&str; 5] = ["br", "hr", "img", "input", "wbr"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingState {
    Idle,
    /// Load seen, waiting for the start delay.
    Scheduled,
    Typing,
    Done,
}

#[derive(Debug)]
pub struct Typewriter {
    source: Vec<char>,
    pos: usize,
    in_tag: bool,
    tag: String,
    typed: String,
    open: Vec<String>,
    start_delay: Duration,
    speed: Duration,
    state: TypingState,
}

fn tag_name(tag: &str) -> &str {
    let inner = tag.trim_start_matches('<').trim_start_matches('/');
    let end = inner
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .unwrap_or(inner.len());
    &inner[..end]
}

impl Typewriter {
    pub fn new(config: &PageConfig) -> Self {
        Self {
            source: config.hero_title_html.chars().collect(),
            pos: 0,
            in_tag: false,
            tag: String::new(),
            typed: String::new(),
            open: Vec::new(),
            start_delay: config.typing_start(),
            speed: config.typing_speed(),
            state: TypingState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> TypingState {
        self.state
    }

    /// Markup typed so far with open tags closed.
    #[must_use]
    pub fn rendered(&self) -> String {
        let mut html = self.typed.clone();
        for name in self.open.iter().rev() {
            html.push_str("</");
            html.push_str(name);
            html.push('>');
        }
        html
    }

    pub(crate) fn page_loaded(&mut self, cx: &mut Cx<'_>) {
        if self.state != TypingState::Idle {
            return;
        }
        self.state = TypingState::Scheduled;
        cx.after(self.start_delay, EffectTask::StartTyping);
    }

    pub(crate) fn start(&mut self, cx: &mut Cx<'_>) {
        self.pos = 0;
        self.in_tag = false;
        self.tag.clear();
        self.typed.clear();
        self.open.clear();
        self.state = TypingState::Typing;
        cx.emit(DomPatch::SetHtml {
            target: ElementRef::HeroTitle,
            html: String::new(),
        });
        self.step(cx);
    }

    pub(crate) fn step(&mut self, cx: &mut Cx<'_>) {
        if self.state != TypingState::Typing {
            return;
        }
        let Some(&ch) = self.source.get(self.pos) else {
            self.state = TypingState::Done;
            debug!(chars = self.source.len(), "hero title typed");
            cx.emit(DomPatch::AppendTypingCursor);
            return;
        };
        self.pos += 1;

        let changed = if ch == '<' {
            self.in_tag = true;
            self.tag.clear();
            self.tag.push(ch);
            false
        } else if ch == '>' && self.in_tag {
            self.in_tag = false;
            self.tag.push(ch);
            self.close_tag();
            true
        } else if self.in_tag {
            self.tag.push(ch);
            false
        } else {
            self.typed.push(ch);
            true
        };

        if changed {
            cx.emit(DomPatch::SetHtml {
                target: ElementRef::HeroTitle,
                html: self.rendered(),
            });
        }
        let delay = if self.in_tag {
            Duration::ZERO
        } else {
            self.speed
        };
        cx.after(delay, EffectTask::TypeNext);
    }

    fn close_tag(&mut self) {
        let tag = std::mem::take(&mut self.tag);
        let name = tag_name(&tag).to_owned();
        if tag.starts_with("</") {
            if let Some(at) = self.open.iter().rposition(|open| *open == name) {
                self.open.truncate(at);
            }
        } else if !tag.ends_with("/>") && !VOID_ELEMENTS.contains(&name.as_str()) {
            self.open.push(name);
        }
        self.typed.push_str(&tag);
    }
}
