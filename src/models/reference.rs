use crate::error::{GenAiError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubjectType {
    Person,
    Animal,
    Product,
    Default,
}

impl SubjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectType::Person => "SUBJECT_TYPE_PERSON",
            SubjectType::Animal => "SUBJECT_TYPE_ANIMAL",
            SubjectType::Product => "SUBJECT_TYPE_PRODUCT",
            SubjectType::Default => "SUBJECT_TYPE_DEFAULT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaskMode {
    Background,
    Foreground,
    UserProvided,
    Semantic,
}

impl MaskMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaskMode::Background => "MASK_MODE_BACKGROUND",
            MaskMode::Foreground => "MASK_MODE_FOREGROUND",
            MaskMode::UserProvided => "MASK_MODE_USER_PROVIDED",
            MaskMode::Semantic => "MASK_MODE_SEMANTIC",
        }
    }

    /// Background and foreground masks are derived by the model itself;
    /// the other modes need caller-supplied mask bytes.
    pub fn requires_image(&self) -> bool {
        match self {
            MaskMode::Background | MaskMode::Foreground => false,
            MaskMode::UserProvided | MaskMode::Semantic => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlType {
    Canny,
    Scribble,
    FaceMesh,
}

impl ControlType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlType::Canny => "CONTROL_TYPE_CANNY",
            ControlType::Scribble => "CONTROL_TYPE_SCRIBBLE",
            ControlType::FaceMesh => "CONTROL_TYPE_FACE_MESH",
        }
    }
}

/// Role-specific configuration of a reference entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceKind {
    Raw,
    Subject {
        description: String,
        subject_type: SubjectType,
    },
    Mask {
        mask_mode: MaskMode,
        dilation: Option<f32>,
    },
    Control {
        control_type: ControlType,
    },
}

impl ReferenceKind {
    pub fn reference_type(&self) -> &'static str {
        match self {
            ReferenceKind::Raw => "REFERENCE_TYPE_RAW",
            ReferenceKind::Subject { .. } => "REFERENCE_TYPE_SUBJECT",
            ReferenceKind::Mask { .. } => "REFERENCE_TYPE_MASK",
            ReferenceKind::Control { .. } => "REFERENCE_TYPE_CONTROL",
        }
    }
}

/// One conditioning image handed to the model alongside the prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceImage {
    pub reference_id: u32,
    pub image: Option<Vec<u8>>,
    pub kind: ReferenceKind,
}

impl ReferenceImage {
    pub fn is_subject(&self) -> bool {
        matches!(self.kind, ReferenceKind::Subject { .. })
    }
}

enum PendingId {
    Auto,
    Explicit(u32),
}

struct PendingReference {
    id: PendingId,
    image: Option<Vec<u8>>,
    kind: ReferenceKind,
}

/// Assembles an ordered, validated set of reference images.
///
/// Ids are either caller-supplied or allocated automatically; automatic
/// allocation takes the smallest id not claimed by any explicit entry,
/// counting up from 0.
pub struct ReferenceSetBuilder {
    entries: Vec<PendingReference>,
}

impl ReferenceSetBuilder {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn entry(mut self, kind: ReferenceKind, image: Option<Vec<u8>>) -> Self {
        self.entries.push(PendingReference {
            id: PendingId::Auto,
            image,
            kind,
        });
        self
    }

    pub fn entry_with_id(mut self, id: u32, kind: ReferenceKind, image: Option<Vec<u8>>) -> Self {
        self.entries.push(PendingReference {
            id: PendingId::Explicit(id),
            image,
            kind,
        });
        self
    }

    pub fn raw(self, image: Vec<u8>) -> Self {
        self.entry(ReferenceKind::Raw, Some(image))
    }

    pub fn raw_with_id(self, id: u32, image: Vec<u8>) -> Self {
        self.entry_with_id(id, ReferenceKind::Raw, Some(image))
    }

    pub fn subject_with_id(
        self,
        id: u32,
        image: Vec<u8>,
        description: impl Into<String>,
        subject_type: SubjectType,
    ) -> Self {
        self.entry_with_id(
            id,
            ReferenceKind::Subject {
                description: description.into(),
                subject_type,
            },
            Some(image),
        )
    }

    pub fn mask_by_mode(self, mask_mode: MaskMode) -> Self {
        self.entry(
            ReferenceKind::Mask {
                mask_mode,
                dilation: None,
            },
            None,
        )
    }

    pub fn mask_by_mode_with_id(self, id: u32, mask_mode: MaskMode) -> Self {
        self.entry_with_id(
            id,
            ReferenceKind::Mask {
                mask_mode,
                dilation: None,
            },
            None,
        )
    }

    pub fn mask_image_with_id(
        self,
        id: u32,
        image: Vec<u8>,
        mask_mode: MaskMode,
        dilation: Option<f32>,
    ) -> Self {
        self.entry_with_id(
            id,
            ReferenceKind::Mask {
                mask_mode,
                dilation,
            },
            Some(image),
        )
    }

    pub fn control_with_id(self, id: u32, image: Vec<u8>, control_type: ControlType) -> Self {
        self.entry_with_id(id, ReferenceKind::Control { control_type }, Some(image))
    }

    pub fn build(self) -> Result<Vec<ReferenceImage>> {
        let mut taken: HashSet<u32> = HashSet::new();
        for pending in &self.entries {
            if let PendingId::Explicit(id) = pending.id {
                if !taken.insert(id) {
                    return Err(GenAiError::DuplicateReferenceId(id));
                }
            }
        }

        let mut next_auto: u32 = 0;
        let mut references = Vec::with_capacity(self.entries.len());
        for pending in self.entries {
            let reference_id = match pending.id {
                PendingId::Explicit(id) => id,
                PendingId::Auto => {
                    while taken.contains(&next_auto) {
                        next_auto += 1;
                    }
                    taken.insert(next_auto);
                    next_auto
                }
            };

            match &pending.kind {
                ReferenceKind::Mask { mask_mode, .. } => {
                    if mask_mode.requires_image() && pending.image.is_none() {
                        return Err(GenAiError::MissingMaskImage(reference_id));
                    }
                }
                ReferenceKind::Raw
                | ReferenceKind::Subject { .. }
                | ReferenceKind::Control { .. } => {
                    if pending.image.is_none() {
                        return Err(GenAiError::MissingReferenceImage(reference_id));
                    }
                }
            }

            references.push(ReferenceImage {
                reference_id,
                image: pending.image,
                kind: pending.kind,
            });
        }

        Ok(references)
    }
}

impl Default for ReferenceSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png() -> Vec<u8> {
        vec![0x89, 0x50, 0x4e, 0x47]
    }

    #[test]
    fn preserves_input_order_with_explicit_ids() {
        let references = ReferenceSetBuilder::new()
            .subject_with_id(1, png(), "a shoe", SubjectType::Product)
            .control_with_id(2, png(), ControlType::Canny)
            .control_with_id(4, png(), ControlType::Canny)
            .build()
            .unwrap();

        let ids: Vec<u32> = references.iter().map(|r| r.reference_id).collect();
        assert_eq!(ids, vec![1, 2, 4]);
        assert!(references[0].is_subject());
    }

    #[test]
    fn duplicate_explicit_ids_fail() {
        let err = ReferenceSetBuilder::new()
            .raw_with_id(1, png())
            .subject_with_id(1, png(), "a mug", SubjectType::Product)
            .build()
            .unwrap_err();
        assert!(matches!(err, GenAiError::DuplicateReferenceId(1)));
    }

    #[test]
    fn auto_ids_skip_explicit_ones() {
        let references = ReferenceSetBuilder::new()
            .raw(png())
            .mask_by_mode_with_id(1, MaskMode::Background)
            .raw(png())
            .build()
            .unwrap();

        let ids: Vec<u32> = references.iter().map(|r| r.reference_id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn background_mask_needs_no_image() {
        let references = ReferenceSetBuilder::new()
            .raw_with_id(0, png())
            .mask_by_mode_with_id(1, MaskMode::Background)
            .build()
            .unwrap();
        assert!(references[1].image.is_none());
    }

    #[test]
    fn user_provided_mask_requires_image() {
        let err = ReferenceSetBuilder::new()
            .entry_with_id(
                1,
                ReferenceKind::Mask {
                    mask_mode: MaskMode::UserProvided,
                    dilation: Some(0.01),
                },
                None,
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, GenAiError::MissingMaskImage(1)));
    }

    #[test]
    fn subject_without_image_fails() {
        let err = ReferenceSetBuilder::new()
            .entry_with_id(
                1,
                ReferenceKind::Subject {
                    description: "a shoe".into(),
                    subject_type: SubjectType::Product,
                },
                None,
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, GenAiError::MissingReferenceImage(1)));
    }

    #[test]
    fn wire_strings_match_vertex_enums() {
        assert_eq!(SubjectType::Product.as_str(), "SUBJECT_TYPE_PRODUCT");
        assert_eq!(MaskMode::Background.as_str(), "MASK_MODE_BACKGROUND");
        assert_eq!(ControlType::Canny.as_str(), "CONTROL_TYPE_CANNY");
        assert_eq!(
            ReferenceKind::Raw.reference_type(),
            "REFERENCE_TYPE_RAW"
        );
    }
}
