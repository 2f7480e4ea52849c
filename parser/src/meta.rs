//! Creation of file meta information groups.
//!
//! The group length `(0002,0000)` is not part of the built tree:
//! [`StreamWriter::write_file_meta`](crate::dataset::StreamWriter::write_file_meta)
//! computes it on output.
use dcmio_core::value::Value;
use dcmio_core::{AttributeTree, VR};
use dcmio_dictionary_std::tags;
use snafu::{Backtrace, OptionExt, Snafu};

/// The implementation class UID written by default.
pub const IMPLEMENTATION_CLASS_UID: &str = "2.25.262086406829110419931297894772577063974";

/// The implementation version name written by default.
pub const IMPLEMENTATION_VERSION_NAME: &str = concat!("DCMIO_RS ", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// A required file meta attribute is missing.
    #[snafu(display("Missing data element `{}`", alias))]
    MissingElement {
        alias: &'static str,
        backtrace: Backtrace,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A builder of file meta information groups.
///
/// # Example
///
/// ```
/// # use dcmio_parser::meta::FileMetaBuilder;
/// # use dcmio_dictionary_std::{tags, uids};
/// let meta = FileMetaBuilder::new()
///     .media_storage_sop_class_uid(uids::SECONDARY_CAPTURE_IMAGE_STORAGE)
///     .media_storage_sop_instance_uid("2.25.1")
///     .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
///     .build()?;
/// assert_eq!(meta.string(tags::TRANSFER_SYNTAX_UID), Some(uids::EXPLICIT_VR_LITTLE_ENDIAN));
/// # Ok::<_, dcmio_parser::meta::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileMetaBuilder {
    information_version: Option<[u8; 2]>,
    media_storage_sop_class_uid: Option<String>,
    media_storage_sop_instance_uid: Option<String>,
    transfer_syntax: Option<String>,
    implementation_class_uid: Option<String>,
    implementation_version_name: Option<String>,
    source_application_entity_title: Option<String>,
    private_information_creator_uid: Option<String>,
    private_information: Option<Vec<u8>>,
}

impl FileMetaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the SOP class and instance UIDs of a data set.
    pub fn from_dataset(tree: &AttributeTree) -> Self {
        let mut builder = Self::new();
        builder.media_storage_sop_class_uid = tree.string(tags::SOP_CLASS_UID).map(String::from);
        builder.media_storage_sop_instance_uid =
            tree.string(tags::SOP_INSTANCE_UID).map(String::from);
        builder
    }

    /// Start from an existing file meta group.
    pub fn from_file_meta(meta: &AttributeTree) -> Self {
        let string = |tag| meta.string(tag).map(String::from);
        FileMetaBuilder {
            information_version: meta
                .value(tags::FILE_META_INFORMATION_VERSION)
                .and_then(Value::bytes)
                .and_then(|b| b.try_into().ok()),
            media_storage_sop_class_uid: string(tags::MEDIA_STORAGE_SOP_CLASS_UID),
            media_storage_sop_instance_uid: string(tags::MEDIA_STORAGE_SOP_INSTANCE_UID),
            transfer_syntax: string(tags::TRANSFER_SYNTAX_UID),
            implementation_class_uid: string(tags::IMPLEMENTATION_CLASS_UID),
            implementation_version_name: string(tags::IMPLEMENTATION_VERSION_NAME),
            source_application_entity_title: string(tags::SOURCE_APPLICATION_ENTITY_TITLE),
            private_information_creator_uid: string(tags::PRIVATE_INFORMATION_CREATOR_UID),
            private_information: meta
                .value(tags::PRIVATE_INFORMATION)
                .and_then(Value::bytes)
                .map(<[u8]>::to_vec),
        }
    }

    pub fn information_version(mut self, value: [u8; 2]) -> Self {
        self.information_version = Some(value);
        self
    }

    pub fn media_storage_sop_class_uid(mut self, value: impl Into<String>) -> Self {
        self.media_storage_sop_class_uid = Some(value.into());
        self
    }

    pub fn media_storage_sop_instance_uid(mut self, value: impl Into<String>) -> Self {
        self.media_storage_sop_instance_uid = Some(value.into());
        self
    }

    pub fn transfer_syntax(mut self, value: impl Into<String>) -> Self {
        self.transfer_syntax = Some(value.into());
        self
    }

    pub fn implementation_class_uid(mut self, value: impl Into<String>) -> Self {
        self.implementation_class_uid = Some(value.into());
        self
    }

    pub fn implementation_version_name(mut self, value: impl Into<String>) -> Self {
        self.implementation_version_name = Some(value.into());
        self
    }

    pub fn source_application_entity_title(mut self, value: impl Into<String>) -> Self {
        self.source_application_entity_title = Some(value.into());
        self
    }

    pub fn private_information_creator_uid(mut self, value: impl Into<String>) -> Self {
        self.private_information_creator_uid = Some(value.into());
        self
    }

    pub fn private_information(mut self, value: impl Into<Vec<u8>>) -> Self {
        self.private_information = Some(value.into());
        self
    }

    /// Build the group.
    ///
    /// The information version defaults to `[0, 1]`;
    /// the implementation class UID and version name default to this library's.
    pub fn build(self) -> Result<AttributeTree> {
        let sop_class = self
            .media_storage_sop_class_uid
            .context(MissingElementSnafu {
                alias: "MediaStorageSOPClassUID",
            })?;
        let sop_instance = self
            .media_storage_sop_instance_uid
            .context(MissingElementSnafu {
                alias: "MediaStorageSOPInstanceUID",
            })?;
        let transfer_syntax = self.transfer_syntax.context(MissingElementSnafu {
            alias: "TransferSyntax",
        })?;
        let (implementation_class_uid, implementation_version_name) =
            match self.implementation_class_uid {
                Some(uid) => (uid, self.implementation_version_name),
                None => (
                    IMPLEMENTATION_CLASS_UID.to_string(),
                    Some(
                        self.implementation_version_name
                            .unwrap_or_else(|| IMPLEMENTATION_VERSION_NAME.to_string()),
                    ),
                ),
            };

        let mut meta = AttributeTree::new();
        meta.put_bytes(
            tags::FILE_META_INFORMATION_VERSION,
            VR::OB,
            self.information_version.unwrap_or([0, 1]).to_vec(),
        );
        meta.put_str(tags::MEDIA_STORAGE_SOP_CLASS_UID, VR::UI, sop_class);
        meta.put_str(tags::MEDIA_STORAGE_SOP_INSTANCE_UID, VR::UI, sop_instance);
        meta.put_str(tags::TRANSFER_SYNTAX_UID, VR::UI, transfer_syntax);
        meta.put_str(tags::IMPLEMENTATION_CLASS_UID, VR::UI, implementation_class_uid);
        if let Some(name) = implementation_version_name {
            meta.put_str(tags::IMPLEMENTATION_VERSION_NAME, VR::SH, name);
        }
        if let Some(aet) = self.source_application_entity_title {
            meta.put_str(tags::SOURCE_APPLICATION_ENTITY_TITLE, VR::AE, aet);
        }
        if let Some(uid) = self.private_information_creator_uid {
            meta.put_str(tags::PRIVATE_INFORMATION_CREATOR_UID, VR::UI, uid);
            if let Some(info) = self.private_information {
                meta.put_bytes(tags::PRIVATE_INFORMATION, VR::OB, info);
            }
        }
        Ok(meta)
    }
}

/// Create a file meta group for the given SOP instance and transfer syntax,
/// with this library as the implementation.
pub fn create_file_meta(sop_class: &str, sop_instance: &str, transfer_syntax: &str) -> AttributeTree {
    let mut meta = AttributeTree::new();
    meta.put_bytes(tags::FILE_META_INFORMATION_VERSION, VR::OB, vec![0, 1]);
    meta.put_str(tags::MEDIA_STORAGE_SOP_CLASS_UID, VR::UI, sop_class);
    meta.put_str(tags::MEDIA_STORAGE_SOP_INSTANCE_UID, VR::UI, sop_instance);
    meta.put_str(tags::TRANSFER_SYNTAX_UID, VR::UI, transfer_syntax);
    meta.put_str(tags::IMPLEMENTATION_CLASS_UID, VR::UI, IMPLEMENTATION_CLASS_UID);
    meta.put_str(tags::IMPLEMENTATION_VERSION_NAME, VR::SH, IMPLEMENTATION_VERSION_NAME);
    meta
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcmio_dictionary_std::uids;

    #[test]
    fn missing_transfer_syntax() {
        let result = FileMetaBuilder::new()
            .media_storage_sop_class_uid(uids::SECONDARY_CAPTURE_IMAGE_STORAGE)
            .media_storage_sop_instance_uid("2.25.7")
            .build();
        assert!(matches!(
            result,
            Err(Error::MissingElement {
                alias: "TransferSyntax",
                ..
            })
        ));
    }

    #[test]
    fn from_dataset_and_defaults() {
        let mut dataset = AttributeTree::new();
        dataset.put_str(tags::SOP_CLASS_UID, VR::UI, uids::SECONDARY_CAPTURE_IMAGE_STORAGE);
        dataset.put_str(tags::SOP_INSTANCE_UID, VR::UI, "2.25.7");
        let meta = FileMetaBuilder::from_dataset(&dataset)
            .transfer_syntax(uids::RLE_LOSSLESS)
            .build()
            .unwrap();
        assert_eq!(
            meta.value(tags::FILE_META_INFORMATION_VERSION).and_then(Value::bytes),
            Some(&[0u8, 1][..])
        );
        assert_eq!(meta.string(tags::MEDIA_STORAGE_SOP_INSTANCE_UID), Some("2.25.7"));
        assert_eq!(meta.string(tags::IMPLEMENTATION_CLASS_UID), Some(IMPLEMENTATION_CLASS_UID));
        assert_eq!(
            meta.string(tags::IMPLEMENTATION_VERSION_NAME),
            Some(IMPLEMENTATION_VERSION_NAME)
        );
        assert_eq!(meta, create_file_meta(
            uids::SECONDARY_CAPTURE_IMAGE_STORAGE,
            "2.25.7",
            uids::RLE_LOSSLESS,
        ));

        // a foreign implementation keeps its own version name, if any
        let meta = FileMetaBuilder::from_file_meta(&meta)
            .implementation_class_uid("1.2.3")
            .implementation_version_name("OTHER")
            .build()
            .unwrap();
        assert_eq!(meta.string(tags::IMPLEMENTATION_VERSION_NAME), Some("OTHER"));
    }
}
