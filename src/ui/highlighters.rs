//! Syntax highlighting for code blocks in assistant messages.
//!
//! A single tokenizer covers every selectable language; languages differ only in their
//! keyword table and line-comment marker.

use crate::types::Language;
use eframe::egui::{self, Color32};
use eframe::epaint::text::{LayoutJob, TextFormat};

struct Palette {
    keyword: Color32,
    string: Color32,
    comment: Color32,
    number: Color32,
    function: Color32,
    default: Color32,
}

impl Palette {
    fn new(dark_mode: bool) -> Self {
        if dark_mode {
            Self {
                keyword: Color32::from_rgb(86, 156, 214),
                string: Color32::from_rgb(206, 145, 120),
                comment: Color32::from_rgb(106, 153, 85),
                number: Color32::from_rgb(181, 206, 168),
                function: Color32::from_rgb(220, 220, 170),
                default: Color32::from_rgb(212, 212, 212),
            }
        } else {
            Self {
                keyword: Color32::from_rgb(0, 0, 170),
                string: Color32::from_rgb(163, 21, 21),
                comment: Color32::from_rgb(0, 128, 0),
                number: Color32::from_rgb(100, 0, 150),
                function: Color32::from_rgb(0, 102, 153),
                default: Color32::BLACK,
            }
        }
    }
}

const PYTHON_KEYWORDS: &[&str] = &[
    "def", "return", "if", "elif", "else", "for", "while", "in", "not", "and", "or", "is",
    "None", "True", "False", "class", "import", "from", "as", "with", "try", "except",
    "finally", "raise", "lambda", "yield", "pass", "break", "continue", "global", "self",
];

const C_KEYWORDS: &[&str] = &[
    "int", "char", "float", "double", "void", "long", "short", "unsigned", "signed", "struct",
    "return", "if", "else", "for", "while", "do", "switch", "case", "break", "continue",
    "const", "static", "sizeof", "typedef", "enum", "NULL", "include", "define",
];

const CPP_KEYWORDS: &[&str] = &[
    "int", "char", "float", "double", "void", "long", "bool", "auto", "struct", "class",
    "return", "if", "else", "for", "while", "do", "switch", "case", "break", "continue",
    "const", "static", "new", "delete", "namespace", "using", "template", "typename",
    "public", "private", "protected", "true", "false", "nullptr", "vector", "std", "include",
];

const JAVA_KEYWORDS: &[&str] = &[
    "public", "private", "protected", "class", "interface", "static", "final", "void", "int",
    "long", "boolean", "char", "double", "new", "return", "if", "else", "for", "while", "do",
    "switch", "case", "break", "continue", "try", "catch", "finally", "throw", "throws",
    "import", "package", "extends", "implements", "this", "null", "true", "false",
];

const JAVASCRIPT_KEYWORDS: &[&str] = &[
    "function", "return", "if", "else", "for", "while", "do", "switch", "case", "break",
    "continue", "var", "let", "const", "new", "this", "typeof", "null", "undefined", "true",
    "false", "in", "of", "try", "catch", "finally", "throw", "class", "extends", "async",
    "await", "import", "export", "default", "from",
];

fn keywords_for(language: Language) -> &'static [&'static str] {
    match language {
        Language::Python => PYTHON_KEYWORDS,
        Language::C => C_KEYWORDS,
        Language::Cpp => CPP_KEYWORDS,
        Language::Java => JAVA_KEYWORDS,
        Language::JavaScript => JAVASCRIPT_KEYWORDS,
    }
}

/// Highlights a code block with syntax coloring.
///
/// # Arguments
///
/// * `text` - The source code to highlight
/// * `language` - Language of the block; `None` renders it uncolored
/// * `font_id` - The font to use for rendering
/// * `dark_mode` - Whether to use the dark palette
///
/// # Returns
///
/// A `LayoutJob` containing the highlighted text with appropriate colors
pub fn highlight_code(
    text: &str,
    language: Option<Language>,
    font_id: egui::FontId,
    dark_mode: bool,
) -> LayoutJob {
    let palette = Palette::new(dark_mode);
    let mut job = LayoutJob::default();

    let Some(language) = language else {
        job.append(text, 0.0, TextFormat::simple(font_id, palette.default));
        return job;
    };
    let keywords = keywords_for(language);
    let hash_comments = language == Language::Python;

    let mut chars = text.char_indices().peekable();
    let end_of = |chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>| {
        chars.peek().map(|&(idx, _)| idx).unwrap_or(text.len())
    };

    while let Some((i, c)) = chars.next() {
        let line_comment = if hash_comments {
            c == '#'
        } else {
            c == '/' && matches!(chars.peek(), Some(&(_, '/')))
        };
        if line_comment {
            while let Some(&(_, ch)) = chars.peek() {
                if ch == '\n' {
                    break;
                }
                chars.next();
            }
            let end = end_of(&mut chars);
            job.append(&text[i..end], 0.0, TextFormat::simple(font_id.clone(), palette.comment));
            continue;
        }

        if !hash_comments && c == '/' && matches!(chars.peek(), Some(&(_, '*'))) {
            chars.next();
            let mut previous = '\0';
            for (_, ch) in chars.by_ref() {
                if previous == '*' && ch == '/' {
                    break;
                }
                previous = ch;
            }
            let end = end_of(&mut chars);
            job.append(&text[i..end], 0.0, TextFormat::simple(font_id.clone(), palette.comment));
            continue;
        }

        if c == '"' || c == '\'' || (c == '`' && language == Language::JavaScript) {
            let mut escaped = false;
            for (_, ch) in chars.by_ref() {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == c || ch == '\n' {
                    break;
                }
            }
            let end = end_of(&mut chars);
            job.append(&text[i..end], 0.0, TextFormat::simple(font_id.clone(), palette.string));
            continue;
        }

        if c.is_ascii_digit() {
            while let Some(&(_, ch)) = chars.peek() {
                if ch.is_ascii_alphanumeric() || ch == '.' || ch == '_' {
                    chars.next();
                } else {
                    break;
                }
            }
            let end = end_of(&mut chars);
            job.append(&text[i..end], 0.0, TextFormat::simple(font_id.clone(), palette.number));
            continue;
        }

        if c.is_alphabetic() || c == '_' || c == '$' {
            while let Some(&(_, ch)) = chars.peek() {
                if ch.is_alphanumeric() || ch == '_' || ch == '$' {
                    chars.next();
                } else {
                    break;
                }
            }
            let end = end_of(&mut chars);
            let word = &text[i..end];
            let color = if keywords.contains(&word) {
                palette.keyword
            } else if matches!(chars.peek(), Some(&(_, '('))) {
                palette.function
            } else {
                palette.default
            };
            job.append(word, 0.0, TextFormat::simple(font_id.clone(), color));
            continue;
        }

        job.append(
            &text[i..i + c.len_utf8()],
            0.0,
            TextFormat::simple(font_id.clone(), palette.default),
        );
    }

    job
}
