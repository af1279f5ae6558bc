// Plain and JSON rendering of command results.

use serde::Serialize;
use std::fmt::Write as _;

use crate::application::{
    AddResultDto, DatabaseInfoDto, DeleteDto, DetailDto, ErrorResponse, MovieDto,
    PendingDeleteDto, ProjectionDto, SearchDto, ViewDto,
};
use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Json,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Self {
        match name {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Plain,
        }
    }
}

/// Human-readable rendering
pub trait PlainText {
    fn plain(&self) -> String;
}

pub fn render<T: Serialize + PlainText>(format: OutputFormat, value: &T) -> AppResult<String> {
    match format {
        OutputFormat::Plain => Ok(value.plain()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
    }
}

pub fn print<T: Serialize + PlainText>(format: OutputFormat, value: &T) -> AppResult<()> {
    println!("{}", render(format, value)?);
    Ok(())
}

/// Errors go to stderr in plain mode, stdout as JSON in json mode
pub fn print_error(format: OutputFormat, error: &ErrorResponse) {
    match format {
        OutputFormat::Plain => match &error.details {
            Some(details) => eprintln!("Error: {} ({})", error.message, details),
            None => eprintln!("Error: {}", error.message),
        },
        OutputFormat::Json => println!("{}", error.to_json()),
    }
}

fn flags(movie: &MovieDto) -> String {
    let mut out = String::new();
    if movie.fav {
        out.push_str(" [fav]");
    }
    if movie.wish {
        out.push_str(" [wish]");
    }
    out
}

impl PlainText for MovieDto {
    fn plain(&self) -> String {
        format!("{} {} {}{}", self.id, self.title, self.subtitle, flags(self))
    }
}

impl PlainText for ProjectionDto {
    fn plain(&self) -> String {
        let mut out = format!(
            "[{}] filter: {} | total {} · favorites {} · wishlist {} · rated {}",
            self.page,
            self.filter,
            self.summary.total,
            self.summary.favorites,
            self.summary.wishlisted,
            self.summary.rated
        );

        if let Some(message) = &self.empty_message {
            let _ = write!(out, "\n{}", message);
        }
        for card in &self.items {
            let _ = write!(out, "\n#{:<3} {}", card.index, card.movie.plain());
        }
        out
    }
}

impl PlainText for SearchDto {
    fn plain(&self) -> String {
        let mut out = self.message.clone();
        for result in &self.results {
            let _ = write!(
                out,
                "\n  {}  {} ({})",
                result.external_id, result.title, result.year
            );
        }
        out
    }
}

impl PlainText for DetailDto {
    fn plain(&self) -> String {
        let mut out = format!("{} ({})  {}", self.title, self.year, self.id);

        for (label, value) in [
            ("Genre", &self.genre),
            ("Runtime", &self.runtime),
            ("Plot", &self.plot),
        ] {
            if !value.is_empty() {
                let _ = write!(out, "\n{}: {}", label, value);
            }
        }

        match &self.movie {
            Some(movie) => {
                let _ = write!(out, "\nIn collection: {}{}", movie.subtitle, flags(movie));
            }
            None => out.push_str("\nNot in collection"),
        }
        if let Some(error) = &self.fetch_error {
            let _ = write!(out, "\n(detail unavailable: {})", error);
        }
        out
    }
}

impl PlainText for AddResultDto {
    fn plain(&self) -> String {
        let title = self
            .movie
            .as_ref()
            .map(|m| m.title.as_str())
            .unwrap_or_default();

        if self.added {
            format!("Added #{}: {}", self.index, title)
        } else {
            format!("Already in collection at #{}: {}", self.index, title)
        }
    }
}

impl PlainText for PendingDeleteDto {
    fn plain(&self) -> String {
        format!("Deleting {} (was #{})", self.id, self.requested_index)
    }
}

impl PlainText for DeleteDto {
    fn plain(&self) -> String {
        if self.removed.is_empty() {
            format!("Nothing removed; {} is gone already", self.requested.id)
        } else {
            format!("Removed: {}", self.removed.join(", "))
        }
    }
}

impl PlainText for ViewDto {
    fn plain(&self) -> String {
        format!(
            "page: {} | filter: {} | theme: {} | detail: {}",
            self.page,
            self.filter,
            self.theme,
            self.open_detail_id.as_deref().unwrap_or("-")
        )
    }
}

impl PlainText for DatabaseInfoDto {
    fn plain(&self) -> String {
        format!(
            "database: {}\nsize: {} bytes ({} pages of {})\nslots: {}\nmovies: {}\nintegrity: {}",
            self.path.as_deref().unwrap_or("(in memory)"),
            self.size_bytes,
            self.page_count,
            self.page_size,
            self.slot_count,
            self.movies,
            if self.integrity_ok { "ok" } else { "FAILED" }
        )
    }
}

impl PlainText for Vec<String> {
    fn plain(&self) -> String {
        format!("Removed: {}", self.join(", "))
    }
}
