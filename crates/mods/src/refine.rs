//! Refinement of raw MODS fields into presentation form.
//!
//! The raw records are wildly inconsistent: shouting-case titles, publisher
//! names folded into label strings, arrangements credited three different
//! ways. The rules here accommodate all of the variants observed in the
//! collection so far.

use crate::{Druid, ModsError, RollMetadata};
use serde::{Deserialize, Serialize};

/// Credits in the form the consolidated catalog wants them: plain strings,
/// empty when unknown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogCredits {
    pub composer: String,
    pub arranger: String,
    pub performer: String,
    /// The assembled work title, before punctuation normalization.
    pub work: String,
}

/// Metadata after refinement: the raw fields with publisher, number, and
/// title rewritten, plus the derived search string and catalog credits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinedMetadata {
    pub meta: RollMetadata,
    /// "Composer/Performer - Title" summary for the app's search bar.
    pub search_title: String,
    pub for_catalog: CatalogCredits,
}

/// Refine raw metadata for presentation.
///
/// - A "[publisher not identified]" placeholder becomes "N/A".
/// - A label of "6926 Welte-Mignon" splits into number and publisher; a
///   roll with no label and no number gets "----" as its number.
/// - The display title is assembled from prefix, title, subtitle, and part
///   fields, with the title's case normalized.
/// - The search title leads with short (surname) credits: an arrangement of
///   Bach by Busoni performed by Bauer becomes "Bach-Busoni/Bauer - ...".
pub fn refine(druid: &Druid, mut meta: RollMetadata) -> Result<RefinedMetadata, ModsError> {
    if meta.publisher.as_deref() == Some("[publisher not identified]") {
        meta.publisher = Some("N/A".to_string());
    }

    // Publisher short name and issue number are often jammed into the label
    if let Some(label) = meta.label.clone() {
        let mut words = label.split(' ');
        let first = words.next().unwrap_or("").to_string();
        let rest: Vec<&str> = words.collect();
        if rest.is_empty() {
            meta.number = Some(label);
        } else {
            meta.number = Some(first);
            meta.publisher = Some(rest.join(" "));
        }
    }
    if meta.label.is_none() && meta.number.is_none() {
        meta.number = Some("----".to_string());
    }

    let title = meta
        .title
        .clone()
        .ok_or_else(|| ModsError::MissingTitle(druid.clone()))?;

    let mut fulltitle = capitalize(&title);
    if let Some(prefix) = &meta.title_prefix {
        fulltitle = format!("{prefix} {fulltitle}");
    }
    if let Some(subtitle) = &meta.subtitle {
        fulltitle = format!("{fulltitle}: {subtitle}");
    }
    if let Some(part_number) = &meta.title_part_number {
        fulltitle = format!("{fulltitle}: {part_number}");
    }
    if let Some(part_name) = &meta.title_part_name {
        fulltitle = format!("{fulltitle}: {part_name}");
    }

    meta.title = Some(normalize_punctuation(&fulltitle));

    // Build the search prefix from short names. An original composer that
    // differs from the credited composer marks an arrangement: the credited
    // composer moves to the arranger slot and the original takes top billing.
    let mut search_prefix: Option<String> = None;

    let mut composer_short = String::new();
    let mut composer = String::new();
    let mut arranger = String::new();
    let mut performer = String::new();

    if let Some(c) = &meta.composer {
        composer_short = short_name(c);
        composer = c.clone();
    }

    if let Some(original) = &meta.original_composer {
        let original_short = short_name(original);
        if meta.composer.is_some() && original_short != composer_short {
            search_prefix = Some(format!("{original_short}-{composer_short}"));
            composer = original.clone();
            arranger = meta.composer.clone().unwrap_or_default();
        }
    } else if meta.composer.is_some() {
        search_prefix = Some(composer_short.clone());
    }

    if let Some(a) = &meta.arranger {
        let arranger_short = short_name(a);
        match search_prefix.as_mut() {
            Some(prefix) if arranger_short != composer_short => {
                prefix.push('-');
                prefix.push_str(&arranger_short);
            }
            _ => search_prefix = Some(arranger_short),
        }
        arranger = a.clone();
    }

    if let Some(p) = &meta.performer {
        let performer_short = short_name(p);
        match search_prefix.as_mut() {
            Some(prefix) => {
                prefix.push('/');
                prefix.push_str(&performer_short);
            }
            None => search_prefix = Some(performer_short),
        }
        performer = p.clone();
    }

    let search_title = match search_prefix {
        Some(prefix) => format!("{prefix} - {fulltitle}"),
        None => fulltitle.clone(),
    };

    Ok(RefinedMetadata {
        meta,
        search_title: normalize_punctuation(&search_title),
        for_catalog: CatalogCredits {
            composer,
            arranger,
            performer,
            work: fulltitle,
        },
    })
}

/// Uppercase the first character and lowercase the rest, taming the
/// all-caps titles common in older records.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Surname part of a "Surname, Given" credit.
fn short_name(name: &str) -> String {
    name.split(',').next().unwrap_or("").trim().to_string()
}

/// Cataloging convention spaces around colons and semicolons; display wants
/// them tight.
fn normalize_punctuation(s: &str) -> String {
    s.replace(" : ", ": ").replace(" ; ", "; ")
}
