use regex::Regex;
use tracing::warn;

use crate::error::ParseError;
use crate::metrics::lexical::normalize_word;
use crate::models::{AnalysisConfig, TimestampFormat, Token, TokenKind};

/// Speaker id assigned to content seen before any speaker label
pub const UNATTRIBUTED_SPEAKER: &str = "unknown";

/// Tokenize a whole transcript into one ordered token stream
///
/// Lines are tokenized one at a time; the cross-line state (current speaker,
/// running clock) lives in the tokenizer itself, so independent transcripts
/// never share state. With `skip_malformed_lines` set, offending lines are
/// logged and dropped instead of aborting the run.
pub fn tokenize(text: &str, config: &AnalysisConfig) -> Result<Vec<Token>, ParseError> {
    let mut tokenizer = LineTokenizer::new(config);
    let mut tokens = Vec::new();

    for (index, line) in text.lines().enumerate() {
        match tokenizer.tokenize_line(line, index + 1) {
            Ok(line_tokens) => tokens.extend(line_tokens),
            Err(err) if config.skip_malformed_lines => {
                warn!("skipping line {}: {}", err.line(), err);
            }
            Err(err) => return Err(err),
        }
    }

    Ok(tokens)
}

/// Line-by-line tokenizer carrying the fold state across lines
///
/// Recognized line shape: an optional speaker label (`[Alice]` or `Alice:`),
/// an optional timestamp, then words and inline markers. Unrecognized marker
/// syntax degrades to plain word text; only a malformed timestamp fails a
/// line.
pub struct LineTokenizer<'a> {
    config: &'a AnalysisConfig,
    /// Speaker inherited by unlabeled continuation lines
    current_speaker: Option<String>,
    /// Running transcript time in seconds
    clock: f64,
    bracket_label: Regex,
    colon_label: Regex,
    overlap_span: Regex,
    segment: Regex,
    silence_body: Regex,
    stamp_candidate: Regex,
}

impl<'a> LineTokenizer<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self {
            config,
            current_speaker: None,
            clock: 0.0,
            bracket_label: Regex::new(r"^\[([^\]]+)\]\s*(.*)$").expect("static pattern"),
            colon_label: Regex::new(r"^([A-Za-z][A-Za-z0-9_.' -]*):\s*(.*)$")
                .expect("static pattern"),
            overlap_span: Regex::new(r"//(.*?)//").expect("static pattern"),
            segment: Regex::new(r"\[[^\]]*\]|[^\s\[]+|\[").expect("static pattern"),
            silence_body: Regex::new(r"(?i)^silence:\s*([0-9]*\.?[0-9]+)\s*s?$")
                .expect("static pattern"),
            stamp_candidate: Regex::new(r"^\d[\d:.]*$").expect("static pattern"),
        }
    }

    /// Tokenize one raw line; `line_number` is 1-based for error reporting
    pub fn tokenize_line(
        &mut self,
        line: &str,
        line_number: usize,
    ) -> Result<Vec<Token>, ParseError> {
        let trimmed = line.trim();
        let mut tokens = Vec::new();
        if trimmed.is_empty() {
            return Ok(tokens);
        }

        let (label, rest) = self.take_speaker_label(trimmed);
        let body = self.take_timestamp(rest, line_number, trimmed)?;

        if let Some(speaker) = label {
            self.current_speaker = Some(speaker.clone());
            tokens.push(Token::at(TokenKind::SpeakerChange, speaker, self.clock));
        } else if self.current_speaker.is_none() && !body.is_empty() {
            // Content before any label is attributed to a synthetic speaker
            self.current_speaker = Some(UNATTRIBUTED_SPEAKER.to_string());
            tokens.push(Token::at(
                TokenKind::SpeakerChange,
                UNATTRIBUTED_SPEAKER,
                self.clock,
            ));
        }

        self.scan_body(body, &mut tokens);
        Ok(tokens)
    }

    /// Split off a leading speaker label, if present
    ///
    /// A leading bracket is a label unless its content is a recognized
    /// marker; a colon-delimited label must start with a letter, so a
    /// leading timestamp is never mistaken for one.
    fn take_speaker_label<'l>(&self, line: &'l str) -> (Option<String>, &'l str) {
        if let Some(caps) = self.bracket_label.captures(line) {
            let inner = caps.get(1).map_or("", |m| m.as_str()).trim();
            if !inner.is_empty() && !self.is_marker_text(inner) {
                let rest_start = caps.get(2).map_or(line.len(), |m| m.start());
                return (Some(inner.to_string()), &line[rest_start..]);
            }
        }

        if let Some(caps) = self.colon_label.captures(line) {
            let label = caps.get(1).map_or("", |m| m.as_str()).trim();
            let rest_start = caps.get(2).map_or(line.len(), |m| m.start());
            return (Some(label.to_string()), &line[rest_start..]);
        }

        (None, line)
    }

    /// Consume a leading timestamp and advance the clock
    ///
    /// A field that looks like a timestamp (digits, colons, dots) but fails
    /// to parse is a hard error; anything else is left for the body scan.
    fn take_timestamp<'l>(
        &mut self,
        rest: &'l str,
        line_number: usize,
        content: &str,
    ) -> Result<&'l str, ParseError> {
        let rest = rest.trim_start();
        let Some(first) = rest.split_whitespace().next() else {
            return Ok(rest);
        };

        if first.contains(':') && self.stamp_candidate.is_match(first) {
            self.clock = self.parse_timestamp(first, line_number, content)?;
            return Ok(rest.strip_prefix(first).unwrap_or("").trim_start());
        }

        Ok(rest)
    }

    fn parse_timestamp(
        &self,
        raw: &str,
        line_number: usize,
        content: &str,
    ) -> Result<f64, ParseError> {
        let malformed = || ParseError::MalformedTimestamp {
            line: line_number,
            found: raw.to_string(),
            content: content.to_string(),
        };

        let parts: Vec<&str> = raw.split(':').collect();
        match (self.config.timestamp_format, parts.len()) {
            (TimestampFormat::MinutesSeconds, 2)
            | (TimestampFormat::HoursMinutesSeconds, 2) => {
                let minutes: u32 = parts[0].parse().map_err(|_| malformed())?;
                let seconds: f64 = parts[1].parse().map_err(|_| malformed())?;
                if seconds >= 60.0 {
                    return Err(malformed());
                }
                Ok(f64::from(minutes) * 60.0 + seconds)
            }
            (TimestampFormat::HoursMinutesSeconds, 3) => {
                let hours: u32 = parts[0].parse().map_err(|_| malformed())?;
                let minutes: u32 = parts[1].parse().map_err(|_| malformed())?;
                let seconds: f64 = parts[2].parse().map_err(|_| malformed())?;
                if minutes >= 60 || seconds >= 60.0 {
                    return Err(malformed());
                }
                Ok(f64::from(hours) * 3600.0 + f64::from(minutes) * 60.0 + seconds)
            }
            _ => Err(malformed()),
        }
    }

    /// Scan the line body into word, filler, silence, and overlap tokens
    fn scan_body(&mut self, body: &str, tokens: &mut Vec<Token>) {
        // The original //...// overlap syntax becomes an overlap marker
        // followed by the enclosed words
        let body = self.overlap_span.replace_all(body, "[overlap] $1");

        let pieces: Vec<String> = self
            .segment
            .find_iter(&body)
            .map(|m| m.as_str().to_string())
            .collect();

        for piece in pieces {
            if let Some(inner) = bracket_content(&piece) {
                if let Some(caps) = self.silence_body.captures(inner) {
                    if let Ok(duration) = caps[1].parse::<f64>() {
                        tokens.push(Token::new(
                            TokenKind::Silence,
                            piece.as_str(),
                            self.clock,
                            self.clock + duration,
                        ));
                        self.clock += duration;
                        continue;
                    }
                }
                if inner.eq_ignore_ascii_case("overlap") {
                    tokens.push(Token::at(TokenKind::Overlap, piece.as_str(), self.clock));
                    continue;
                }
                if self.config.is_filler(&inner.to_lowercase()) {
                    tokens.push(Token::at(TokenKind::Filler, piece.as_str(), self.clock));
                    continue;
                }
                // Unrecognized marker syntax degrades to a plain word
                tokens.push(Token::at(TokenKind::Word, piece.as_str(), self.clock));
                continue;
            }

            let kind = match normalize_word(&piece) {
                Some(form) if self.config.is_filler(&form) => TokenKind::Filler,
                _ => TokenKind::Word,
            };
            tokens.push(Token::at(kind, piece.as_str(), self.clock));
        }
    }

    /// Whether bracketed text is a recognized inline marker
    fn is_marker_text(&self, inner: &str) -> bool {
        self.silence_body.is_match(inner)
            || inner.eq_ignore_ascii_case("overlap")
            || self.config.is_filler(&inner.to_lowercase())
    }
}

/// Inner text of a fully bracketed piece, if it is one
fn bracket_content(piece: &str) -> Option<&str> {
    piece
        .strip_prefix('[')
        .and_then(|p| p.strip_suffix(']'))
        .map(str::trim)
}
