//! Raw field extraction from a roll's object XML.

use crate::{Druid, ModsError, RollType};
use regex::Regex;
use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::warn;

/// Matches the display-image declaration in the object XML, outside the MODS
/// record proper, and captures the image id of the first page scan.
const IMAGE_LABEL_PATTERN: &str =
    r#"(?s)<label>(?:display image|jp2|[Ii]mage \d)</label>.*?<file id="([^.]*)\.jp2"#;

/// Compiled once, reused across records.
static IMAGE_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(IMAGE_LABEL_PATTERN).expect("image label pattern"));

/// Raw metadata pulled from a roll's MODS record, before refinement.
///
/// Every field is exactly what the record said, including missing values;
/// [`crate::refine`] turns this into presentation form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollMetadata {
    pub title_prefix: Option<String>,
    pub title: Option<String>,
    pub title_part_number: Option<String>,
    pub title_part_name: Option<String>,
    pub subtitle: Option<String>,
    pub composer: Option<String>,
    pub performer: Option<String>,
    pub arranger: Option<String>,
    pub original_composer: Option<String>,
    /// Publisher label, usually "NUMBER Publisher Name".
    pub label: Option<String>,
    pub publisher: Option<String>,
    pub number: Option<String>,
    pub publish_date: Option<String>,
    pub publish_place: Option<String>,
    pub recording_date: Option<String>,
    pub roll_type: RollType,
    /// Permanent URL of the repository object.
    pub purl: String,
    /// IIIF info.json URL for the roll scan, if the record names one.
    pub image_url: Option<String>,
}

/// Extract raw metadata for `druid` from its object XML.
///
/// `xml` is the full public object document; the MODS fragment is sliced out
/// of it before parsing because the surrounding envelope is not always
/// well-formed XML. The image URL is resolved against the raw document since
/// the file inventory lives outside the MODS record.
pub fn extract(
    druid: &Druid,
    xml: &str,
    purl_base: &str,
    iiif_base: &str,
) -> Result<RollMetadata, ModsError> {
    let fragment = mods_fragment(xml).ok_or_else(|| ModsError::NoModsRecord(druid.clone()))?;
    let doc = Document::parse(fragment).map_err(|e| ModsError::Parse {
        druid: druid.clone(),
        message: e.to_string(),
    })?;
    let root = doc.root_element();

    let image_url = image_url(xml, iiif_base);
    if image_url.is_none() {
        warn!(%druid, "no display image id in object XML");
    }

    Ok(RollMetadata {
        title_prefix: primary_title_part(root, "nonSort"),
        title: primary_title_part(root, "title"),
        title_part_number: primary_title_part(root, "partNumber"),
        title_part_name: primary_title_part(root, "partName"),
        subtitle: first_subtitle(root),
        composer: name_by_roles(root, &["composer", "Composer", "composer.", "cmp"]),
        performer: name_by_roles(root, &["instrumentalist", "instrumentalist."]),
        arranger: name_by_roles(root, &["arranger of music", "arranger"]),
        original_composer: related_work_name(
            root,
            &[
                "Based on (work) :",
                "Based on",
                "Adaptation of (work) :",
                "Adaptation of",
                "Arrangement of :",
                "Arrangement of",
            ],
        ),
        label: identifier(root, "issue number", Some("Roll number"))
            .or_else(|| identifier(root, "issue number", None)),
        publisher: identifier(root, "publisher", None)
            .or_else(|| origin_child(root, Some(("eventType", "publication")), "publisher", None))
            .or_else(|| corporate_name(root))
            .or_else(|| name_with_role(root, "publisher.", false)),
        number: identifier(root, "publisher number", None),
        publish_date: origin_child(
            root,
            Some(("eventType", "publication")),
            "dateIssued",
            Some(("keyDate", "yes")),
        )
        .or_else(|| origin_child(root, Some(("eventType", "publication")), "dateIssued", None))
        .or_else(|| origin_child(root, None, "dateIssued", Some(("point", "start"))))
        .or_else(|| origin_child(root, Some(("displayLabel", "publisher")), "dateIssued", None)),
        publish_place: origin_place(root, Some(("eventType", "publication")), Some(("type", "text")))
            .or_else(|| origin_place(root, Some(("displayLabel", "publisher")), None)),
        recording_date: typed_note(root, "venue")
            .or_else(|| origin_child(root, Some(("eventType", "publication")), "dateCaptured", None)),
        roll_type: resolve_roll_type(root),
        purl: format!("{purl_base}{druid}"),
        image_url,
    })
}

/// Slice the `<mods>...</mods>` fragment out of the object XML.
fn mods_fragment(xml: &str) -> Option<&str> {
    let start = xml.find("<mods")?;
    let end = xml[start..].find("</mods>")?;
    Some(&xml[start..start + end + "</mods>".len()])
}

/// Build the IIIF info.json URL from the first display-image declaration.
fn image_url(xml: &str, iiif_base: &str) -> Option<String> {
    let image_id = IMAGE_LABEL_RE.captures(xml)?.get(1)?.as_str();
    let stem = image_id.split('_').next().unwrap_or(image_id);
    Some(format!(
        "{}/{}/{}/info.json",
        iiif_base.trim_end_matches('/'),
        stem,
        image_id
    ))
}

/// Resolve the roll type from the physical description, falling back to
/// uncategorized notes elsewhere in the record.
fn resolve_roll_type(root: Node) -> RollType {
    let type_note = physical_note(root, "Roll type");
    let scale_note = physical_note(root, "Scale");

    let mut roll_type = type_note
        .as_deref()
        .and_then(RollType::from_note)
        .unwrap_or_default();
    // "standard" marks a generic 88-note roll; a more specific note
    // elsewhere in the record may override it.
    let generic = type_note
        .as_deref()
        .map(|t| t.trim().trim_end_matches('.') == "standard")
        .unwrap_or(false);

    if roll_type == RollType::Unknown || generic {
        if let Some(scale) = scale_note.as_deref().and_then(RollType::from_note) {
            roll_type = scale;
        }
    }

    if roll_type == RollType::Unknown || generic {
        for note in elems(root, "note") {
            if let Some(found) = note.text().and_then(RollType::from_note) {
                // Most rolls of any type are also marked "88n"; never let
                // that overwrite a more specific note.
                if found != RollType::EightyEightNote || roll_type == RollType::Unknown {
                    roll_type = found;
                }
            }
        }
    }

    roll_type
}

/// Element children of `parent` with the given local name, in document order.
fn elems<'a, 'input>(parent: Node<'a, 'input>, name: &str) -> Vec<Node<'a, 'input>> {
    parent
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == name)
        .collect()
}

fn text(node: Node) -> Option<String> {
    node.text().map(|t| t.to_string())
}

/// First `part` element of the primary title, and its text.
fn primary_title_part(root: Node, part: &str) -> Option<String> {
    elems(root, "titleInfo")
        .into_iter()
        .filter(|ti| ti.attribute("usage") == Some("primary"))
        .flat_map(|ti| elems(ti, part))
        .next()
        .and_then(text)
}

/// First subtitle in any titleInfo, primary or not.
fn first_subtitle(root: Node) -> Option<String> {
    elems(root, "titleInfo")
        .into_iter()
        .flat_map(|ti| elems(ti, "subTitle"))
        .next()
        .and_then(text)
}

/// First name with the given role term; returns the first namePart that has
/// text, skipping date nameParts when `exclude_date` is set.
fn name_with_role(root: Node, role: &str, exclude_date: bool) -> Option<String> {
    for name in elems(root, "name") {
        let has_role = name
            .descendants()
            .any(|d| d.is_element() && d.tag_name().name() == "roleTerm" && d.text() == Some(role));
        if !has_role {
            continue;
        }
        for part in elems(name, "namePart") {
            if exclude_date && part.attribute("type") == Some("date") {
                continue;
            }
            if let Some(t) = text(part) {
                return Some(t);
            }
        }
    }
    None
}

fn name_by_roles(root: Node, roles: &[&str]) -> Option<String> {
    roles
        .iter()
        .find_map(|role| name_with_role(root, role, true))
}

/// Personal name on a related item with one of the given display labels.
/// Labels are tried in order; the first that yields a name wins.
fn related_work_name(root: Node, labels: &[&str]) -> Option<String> {
    for label in labels {
        for item in elems(root, "relatedItem") {
            if item.attribute("displayLabel") != Some(*label) {
                continue;
            }
            for name in elems(item, "name") {
                if name.attribute("type") != Some("personal") {
                    continue;
                }
                for part in elems(name, "namePart") {
                    if part.attribute("type") == Some("date") {
                        continue;
                    }
                    if let Some(t) = text(part) {
                        return Some(t);
                    }
                }
            }
        }
    }
    None
}

fn identifier(root: Node, id_type: &str, display_label: Option<&str>) -> Option<String> {
    for id in elems(root, "identifier") {
        if id.attribute("type") != Some(id_type) {
            continue;
        }
        if let Some(dl) = display_label {
            if id.attribute("displayLabel") != Some(dl) {
                continue;
            }
        }
        if let Some(t) = text(id) {
            return Some(t);
        }
    }
    None
}

fn corporate_name(root: Node) -> Option<String> {
    for name in elems(root, "name") {
        if name.attribute("type") != Some("corporate") {
            continue;
        }
        for nt in elems(name, "nameType") {
            if let Some(t) = text(nt) {
                return Some(t);
            }
        }
    }
    None
}

/// Text of an originInfo child, optionally filtered by attributes on the
/// originInfo itself and on the child.
fn origin_child(
    root: Node,
    origin_attr: Option<(&str, &str)>,
    child: &str,
    child_attr: Option<(&str, &str)>,
) -> Option<String> {
    for origin in elems(root, "originInfo") {
        if let Some((k, v)) = origin_attr {
            if origin.attribute(k) != Some(v) {
                continue;
            }
        }
        for elem in elems(origin, child) {
            if let Some((k, v)) = child_attr {
                if elem.attribute(k) != Some(v) {
                    continue;
                }
            }
            if let Some(t) = text(elem) {
                return Some(t);
            }
        }
    }
    None
}

fn origin_place(
    root: Node,
    origin_attr: Option<(&str, &str)>,
    term_attr: Option<(&str, &str)>,
) -> Option<String> {
    for origin in elems(root, "originInfo") {
        if let Some((k, v)) = origin_attr {
            if origin.attribute(k) != Some(v) {
                continue;
            }
        }
        for place in elems(origin, "place") {
            for term in elems(place, "placeTerm") {
                if let Some((k, v)) = term_attr {
                    if term.attribute(k) != Some(v) {
                        continue;
                    }
                }
                if let Some(t) = text(term) {
                    return Some(t);
                }
            }
        }
    }
    None
}

/// Text of a `physicalDescription` note with the given display label.
fn physical_note(root: Node, display_label: &str) -> Option<String> {
    for desc in elems(root, "physicalDescription") {
        for note in elems(desc, "note") {
            if note.attribute("displayLabel") != Some(display_label) {
                continue;
            }
            if let Some(t) = text(note) {
                return Some(t);
            }
        }
    }
    None
}

fn typed_note(root: Node, note_type: &str) -> Option<String> {
    for note in elems(root, "note") {
        if note.attribute("type") != Some(note_type) {
            continue;
        }
        if let Some(t) = text(note) {
            return Some(t);
        }
    }
    None
}
