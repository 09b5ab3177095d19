//! Resume Renderer: turns a `TailoredResume` plus the profile's personal
//! info, education and certifications into one Word document, and writes it
//! under the output directory without replacing earlier documents.
//!
//! `layout` decides what goes on the page; `DocxRenderer` decides how it looks.

use std::io::{Cursor, ErrorKind};
use std::path::{Path, PathBuf};

use chrono::Local;
use docx_rs::{AlignmentType, Docx, PageMargin, Paragraph, Run};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::{Profile, TailoredResume};
use crate::store::write_fully;

/// Highest `_N` suffix tried before giving up on a free file name.
const MAX_SUFFIX: u32 = 1000;

/// 0.5 inch, in twentieths of a point.
const MARGIN_TWIPS: i32 = 720;

pub trait ResumeRenderer {
    /// File extension of the produced document, without the dot.
    fn extension(&self) -> &'static str;

    fn render(&self, resume: &TailoredResume, profile: &Profile) -> Result<Vec<u8>, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

/// One line of the document, in reading order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Name(String),
    Contact(String),
    Links(String),
    Heading(&'static str),
    Body(String),
    /// `title | company`
    Role(String),
    /// `start - end`
    Dates(String),
    Bullet(String),
    Education { entry: String, year: Option<String> },
    Gap,
}

/// Orders the document's content. Empty sections are left out.
pub fn layout(resume: &TailoredResume, profile: &Profile) -> Vec<Block> {
    let info = &profile.personal_info;
    let mut blocks = vec![
        Block::Name(info.name.clone()),
        Block::Contact(format!("{} | {} | {}", info.email, info.phone, info.location)),
    ];
    let links: Vec<&str> = info.links().collect();
    if !links.is_empty() {
        blocks.push(Block::Links(links.join(" | ")));
    }
    blocks.push(Block::Gap);

    if !resume.about_me().is_empty() {
        blocks.push(Block::Heading("PROFESSIONAL SUMMARY"));
        blocks.push(Block::Body(resume.about_me().to_string()));
    }

    if !resume.selected_experiences().is_empty() {
        blocks.push(Block::Heading("PROFESSIONAL EXPERIENCE"));
        for job in resume.selected_experiences() {
            blocks.push(Block::Role(format!("{} | {}", job.title, job.company)));
            blocks.push(Block::Dates(format!("{} - {}", job.start_date, job.end_date)));
            blocks.extend(job.duties.iter().cloned().map(Block::Bullet));
            blocks.push(Block::Gap);
        }
    }

    if !profile.education.is_empty() {
        blocks.push(Block::Heading("EDUCATION"));
        for edu in &profile.education {
            let year = edu.year.trim();
            blocks.push(Block::Education {
                entry: format!("{} - {}", edu.degree, edu.institution),
                year: (!year.is_empty()).then(|| year.to_string()),
            });
        }
        blocks.push(Block::Gap);
    }

    if !resume.tailored_skills().is_empty() {
        blocks.push(Block::Heading("SKILLS"));
        blocks.push(Block::Body(resume.tailored_skills().join(" • ")));
    }

    if !profile.certifications.is_empty() {
        blocks.push(Block::Heading("CERTIFICATIONS"));
        blocks.extend(profile.certifications.iter().cloned().map(Block::Bullet));
    }

    blocks
}

// ────────────────────────────────────────────────────────────────────────────
// Word document
// ────────────────────────────────────────────────────────────────────────────

/// `.docx` with narrow margins, a centered bold name and bold section headings.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxRenderer;

impl DocxRenderer {
    fn paragraph(block: &Block) -> Paragraph {
        // Run sizes are in half-points.
        match block {
            Block::Name(name) => Paragraph::new()
                .add_run(Run::new().add_text(name).size(40).bold())
                .align(AlignmentType::Center),
            Block::Contact(text) => Paragraph::new()
                .add_run(Run::new().add_text(text).size(20))
                .align(AlignmentType::Center),
            Block::Links(text) => Paragraph::new()
                .add_run(Run::new().add_text(text).size(18).color("0000FF"))
                .align(AlignmentType::Center),
            Block::Heading(title) => {
                Paragraph::new().add_run(Run::new().add_text(*title).size(24).bold())
            }
            Block::Body(text) => Paragraph::new().add_run(Run::new().add_text(text).size(20)),
            Block::Role(text) => {
                Paragraph::new().add_run(Run::new().add_text(text).size(22).bold())
            }
            Block::Dates(text) => {
                Paragraph::new().add_run(Run::new().add_text(text).size(20).italic())
            }
            Block::Bullet(text) => {
                Paragraph::new().add_run(Run::new().add_text(format!("• {text}")).size(20))
            }
            Block::Education { entry, year } => {
                let mut paragraph =
                    Paragraph::new().add_run(Run::new().add_text(entry).size(20).bold());
                if let Some(year) = year {
                    paragraph = paragraph.add_run(Run::new().add_text(format!(" ({year})")).size(20));
                }
                paragraph
            }
            Block::Gap => Paragraph::new(),
        }
    }
}

impl ResumeRenderer for DocxRenderer {
    fn extension(&self) -> &'static str {
        "docx"
    }

    fn render(&self, resume: &TailoredResume, profile: &Profile) -> Result<Vec<u8>, AppError> {
        let docx = layout(resume, profile).iter().fold(
            Docx::new().page_margin(
                PageMargin::new()
                    .top(MARGIN_TWIPS)
                    .bottom(MARGIN_TWIPS)
                    .left(MARGIN_TWIPS)
                    .right(MARGIN_TWIPS),
            ),
            |docx, block| docx.add_paragraph(Self::paragraph(block)),
        );

        let mut bytes = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut bytes)
            .map_err(|e| AppError::Render(format!("could not build the Word document: {e}")))?;
        Ok(bytes.into_inner())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output files
// ────────────────────────────────────────────────────────────────────────────

/// `resume_YYYYMMDD_HHMMSS` in local time.
pub fn default_base_name() -> String {
    format!("resume_{}", Local::now().format("%Y%m%d_%H%M%S"))
}

/// Reduces a user-supplied name to a safe file stem. Spaces become
/// underscores; anything outside `[A-Za-z0-9_-]` is dropped, as is a
/// trailing `.docx` or `.txt`. Returns `None` when nothing usable is left.
pub fn sanitize_base_name(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let stem = match trimmed.rsplit_once('.') {
        Some((stem, ext)) if ["docx", "txt"].iter().any(|e| ext.eq_ignore_ascii_case(e)) => stem,
        _ => trimmed,
    };
    let cleaned: String = stem
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            c if c.is_ascii_alphanumeric() || c == '_' || c == '-' => Some(c),
            _ => None,
        })
        .collect();
    let cleaned = cleaned.trim_matches(['_', '-']).to_string();
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Writes `contents` to `<dir>/<base>.<extension>`, or `<base>_2`, `<base>_3`
/// and so on when that name is taken. Returns the path written.
pub fn write_document(
    dir: &Path,
    base: &str,
    extension: &str,
    contents: &[u8],
) -> Result<PathBuf, AppError> {
    std::fs::create_dir_all(dir).map_err(|e| AppError::io(dir, e))?;

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| AppError::io(dir, e))?;
    write_fully(&mut temp, contents).map_err(|e| AppError::io(temp.path(), e))?;

    for n in 1..=MAX_SUFFIX {
        let name = if n == 1 {
            format!("{base}.{extension}")
        } else {
            format!("{base}_{n}.{extension}")
        };
        let target = dir.join(name);
        match temp.persist_noclobber(&target) {
            Ok(_) => {
                info!("Wrote resume to {}", target.display());
                return Ok(target);
            }
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                debug!("{} exists, trying the next name", target.display());
                temp = e.file;
            }
            Err(e) => return Err(AppError::io(target, e.error)),
        }
    }

    Err(AppError::io(
        dir.join(format!("{base}.{extension}")),
        std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free file name after {MAX_SUFFIX} attempts"),
        ),
    ))
}
