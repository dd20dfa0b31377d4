//! AcroForm text field writing and reading for [`LopdfEngine`].
//!
//! Each layout entry becomes a merged field/widget dictionary (`/FT /Tx`)
//! referenced from both the page's `/Annots` and the catalog's
//! `/AcroForm /Fields`. Page-space rectangles (top-left origin) are flipped
//! into PDF user space against the page's MediaBox.

use super::lopdf_engine::{PageBox, ordered_pages, rect_from_array};
use super::{FormFieldInfo, FormWriter};
use crate::constants::FORM_FONT_RESOURCE;
use crate::document::LopdfEngine;
use crate::error::{DocumentError, DocumentResult};
use crate::export::FieldLayoutEntry;
use crate::types::FieldType;
use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat, dictionary};
use std::collections::HashMap;
use tracing::{debug, info};

/// Widget annotation flag: print
const ANNOT_FLAG_PRINT: i64 = 4;

/// Maximum `/Kids` nesting followed while reading fields
const MAX_FIELD_DEPTH: usize = 16;

impl FormWriter for LopdfEngine {
    fn write_fields(&self, bytes: &[u8], layout: &[FieldLayoutEntry]) -> DocumentResult<Vec<u8>> {
        let mut doc = LopdfEngine::load(bytes)?;
        let pages = ordered_pages(&doc);

        if !layout.is_empty() {
            let acroform_id = ensure_acroform(&mut doc)?;
            for entry in layout {
                let (page_id, page_box) = *pages
                    .get(entry.page)
                    .ok_or(DocumentError::PageIndex(entry.page))?;

                let field_id = doc.add_object(field_dictionary(entry, page_id, &page_box));
                push_reference(&mut doc, page_id, b"Annots", field_id)?;
                push_reference(&mut doc, acroform_id, b"Fields", field_id)?;
            }
            info!(fields = layout.len(), "wrote form fields");
        }

        let mut output = Vec::new();
        doc.save_to(&mut output)?;
        Ok(output)
    }

    fn read_fields(&self, bytes: &[u8]) -> DocumentResult<Vec<FormFieldInfo>> {
        let doc = LopdfEngine::load(bytes)?;
        let pages = ordered_pages(&doc);
        let widget_pages = widget_page_map(&doc, &pages);

        let root_id = doc.trailer.get(b"Root")?.as_reference()?;
        let Some(acroform) = doc
            .get_dictionary(root_id)?
            .get(b"AcroForm")
            .ok()
            .and_then(|o| resolve_dict(&doc, o))
        else {
            return Ok(Vec::new());
        };
        let Some(fields) = acroform.get(b"Fields").ok().and_then(|o| resolve_array(&doc, o)) else {
            return Ok(Vec::new());
        };

        let mut reader = FieldReader {
            doc: &doc,
            pages: &pages,
            widget_pages: &widget_pages,
            found: Vec::new(),
        };
        for field in fields {
            if let Object::Reference(id) = field {
                reader.visit(*id, None, None, 0);
            }
        }
        debug!(fields = reader.found.len(), "read form fields");
        Ok(reader.found)
    }
}

fn field_dictionary(entry: &FieldLayoutEntry, page_id: ObjectId, page_box: &PageBox) -> Dictionary {
    let x1 = page_box.llx + entry.x;
    let x2 = x1 + entry.width;
    let y_top = page_box.ury - entry.y;
    let y_bottom = y_top - entry.height;
    let appearance = format!("/{} {} Tf 0 g", FORM_FONT_RESOURCE, entry.font_size);

    let field_type = entry.field_type.pdf_field_type();

    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "FT" => Object::Name(field_type.as_bytes().to_vec()),
        "T" => encode_text(&entry.name),
        "Rect" => vec![
            Object::Real(x1),
            Object::Real(y_bottom),
            Object::Real(x2),
            Object::Real(y_top),
        ],
        "P" => page_id,
        "F" => ANNOT_FLAG_PRINT,
        "DA" => Object::String(appearance.into_bytes(), StringFormat::Literal),
        "V" => encode_text(&entry.value),
        "DV" => encode_text(&entry.value),
    }
}

/// Find or create the catalog's AcroForm dictionary as an indirect object.
fn ensure_acroform(doc: &mut Document) -> DocumentResult<ObjectId> {
    let root_id = doc.trailer.get(b"Root")?.as_reference()?;
    let existing = doc.get_dictionary(root_id)?.get(b"AcroForm").ok().cloned();

    let acroform_id = match existing {
        Some(Object::Reference(id)) => return Ok(id),
        Some(Object::Dictionary(dict)) => doc.add_object(dict),
        _ => doc.add_object(dictionary! {
            "Fields" => Vec::<Object>::new(),
            "NeedAppearances" => true,
            "DA" => Object::String(
                format!("/{} 0 Tf 0 g", FORM_FONT_RESOURCE).into_bytes(),
                StringFormat::Literal,
            ),
            "DR" => dictionary! {
                "Font" => dictionary! {
                    FORM_FONT_RESOURCE => dictionary! {
                        "Type" => "Font",
                        "Subtype" => "Type1",
                        "BaseFont" => "Helvetica",
                    },
                },
            },
        }),
    };

    doc.get_object_mut(root_id)?
        .as_dict_mut()?
        .set("AcroForm", Object::Reference(acroform_id));
    Ok(acroform_id)
}

/// Append `value` to the array under `key` in the dictionary `owner`,
/// following one level of indirection and creating the array if absent.
fn push_reference(doc: &mut Document, owner: ObjectId, key: &[u8], value: ObjectId) -> DocumentResult<()> {
    let indirect = match doc.get_dictionary(owner)?.get(key) {
        Ok(Object::Reference(id)) => Some(*id),
        _ => None,
    };

    if let Some(array_id) = indirect {
        doc.get_object_mut(array_id)?
            .as_array_mut()?
            .push(Object::Reference(value));
        return Ok(());
    }

    let dict = doc.get_object_mut(owner)?.as_dict_mut()?;
    if let Ok(Object::Array(array)) = dict.get_mut(key) {
        array.push(Object::Reference(value));
    } else {
        dict.set(key.to_vec(), Object::Array(vec![Object::Reference(value)]));
    }
    Ok(())
}

/// Encode text as a PDF string: literal for ASCII, UTF-16BE with BOM otherwise.
fn encode_text(text: &str) -> Object {
    if text.is_ascii() {
        return Object::String(text.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn decode_text(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    String::from_utf8_lossy(bytes).into_owned()
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn resolve_dict<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
    resolve(doc, object).and_then(|o| o.as_dict().ok())
}

fn resolve_array<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Vec<Object>> {
    resolve(doc, object).and_then(|o| o.as_array().ok())
}

/// Map every annotation reference to the index of the page listing it.
fn widget_page_map(doc: &Document, pages: &[(ObjectId, PageBox)]) -> HashMap<ObjectId, usize> {
    let mut map = HashMap::new();
    for (index, (page_id, _)) in pages.iter().enumerate() {
        let Some(annots) = doc
            .get_dictionary(*page_id)
            .ok()
            .and_then(|page| page.get(b"Annots").ok())
            .and_then(|o| resolve_array(doc, o))
        else {
            continue;
        };
        for annot in annots {
            if let Object::Reference(id) = annot {
                map.insert(*id, index);
            }
        }
    }
    map
}

struct FieldReader<'a> {
    doc: &'a Document,
    pages: &'a [(ObjectId, PageBox)],
    widget_pages: &'a HashMap<ObjectId, usize>,
    found: Vec<FormFieldInfo>,
}

impl FieldReader<'_> {
    /// Walk a field node, inheriting `/FT` and qualifying names through `/Kids`.
    fn visit(&mut self, id: ObjectId, parent_name: Option<&str>, inherited_type: Option<&[u8]>, depth: usize) {
        if depth > MAX_FIELD_DEPTH {
            return;
        }
        let doc = self.doc;
        let Ok(dict) = doc.get_dictionary(id) else {
            return;
        };

        let partial = dict.get(b"T").ok().and_then(|o| o.as_str().ok()).map(decode_text);
        let name = match (parent_name, partial) {
            (Some(parent), Some(partial)) => Some(format!("{}.{}", parent, partial)),
            (Some(parent), None) => Some(parent.to_string()),
            (None, partial) => partial,
        };
        let field_type = dict.get(b"FT").ok().and_then(|o| o.as_name().ok()).or(inherited_type);

        if let Some(kids) = dict.get(b"Kids").ok().and_then(|o| resolve_array(doc, o)) {
            for kid in kids {
                if let Object::Reference(kid_id) = kid {
                    self.visit(*kid_id, name.as_deref(), field_type, depth + 1);
                }
            }
            return;
        }

        let Some(rect) = dict
            .get(b"Rect")
            .ok()
            .and_then(|o| resolve_array(doc, o))
            .and_then(|a| rect_from_array(a))
        else {
            return;
        };

        let page = self.widget_pages.get(&id).copied().or_else(|| {
            let page_ref = dict.get(b"P").ok()?.as_reference().ok()?;
            self.pages.iter().position(|(page_id, _)| *page_id == page_ref)
        });
        let page_top = page
            .and_then(|p| self.pages.get(p))
            .map(|(_, page_box)| (page_box.llx, page_box.ury))
            .unwrap_or((0.0, rect.ury));

        let value = dict
            .get(b"V")
            .ok()
            .and_then(|o| o.as_str().ok())
            .map(decode_text)
            .unwrap_or_default();

        self.found.push(FormFieldInfo {
            name: name.unwrap_or_default(),
            field_type: field_type.and_then(FieldType::from_pdf_field_type),
            page,
            x: rect.llx - page_top.0,
            y: page_top.1 - rect.ury,
            width: rect.width(),
            height: rect.height(),
            value,
        });
    }
}
