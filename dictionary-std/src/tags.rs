//! Tag constants of the attributes known to the standard dictionary.
//!
//! Repeating groups (50xx, 60xx) are declared with the lowest group.

use dcmio_core::dictionary::DictionaryEntryRef;
use dcmio_core::header::{Tag, VR};

/// FileMetaInformationGroupLength (0002,0000) UL
#[rustfmt::skip]
pub const FILE_META_INFORMATION_GROUP_LENGTH: Tag = Tag(0x0002, 0x0000);
/// FileMetaInformationVersion (0002,0001) OB
#[rustfmt::skip]
pub const FILE_META_INFORMATION_VERSION: Tag = Tag(0x0002, 0x0001);
/// MediaStorageSOPClassUID (0002,0002) UI
#[rustfmt::skip]
pub const MEDIA_STORAGE_SOP_CLASS_UID: Tag = Tag(0x0002, 0x0002);
/// MediaStorageSOPInstanceUID (0002,0003) UI
#[rustfmt::skip]
pub const MEDIA_STORAGE_SOP_INSTANCE_UID: Tag = Tag(0x0002, 0x0003);
/// TransferSyntaxUID (0002,0010) UI
#[rustfmt::skip]
pub const TRANSFER_SYNTAX_UID: Tag = Tag(0x0002, 0x0010);
/// ImplementationClassUID (0002,0012) UI
#[rustfmt::skip]
pub const IMPLEMENTATION_CLASS_UID: Tag = Tag(0x0002, 0x0012);
/// ImplementationVersionName (0002,0013) SH
#[rustfmt::skip]
pub const IMPLEMENTATION_VERSION_NAME: Tag = Tag(0x0002, 0x0013);
/// SourceApplicationEntityTitle (0002,0016) AE
#[rustfmt::skip]
pub const SOURCE_APPLICATION_ENTITY_TITLE: Tag = Tag(0x0002, 0x0016);
/// PrivateInformationCreatorUID (0002,0100) UI
#[rustfmt::skip]
pub const PRIVATE_INFORMATION_CREATOR_UID: Tag = Tag(0x0002, 0x0100);
/// PrivateInformation (0002,0102) OB
#[rustfmt::skip]
pub const PRIVATE_INFORMATION: Tag = Tag(0x0002, 0x0102);
/// SpecificCharacterSet (0008,0005) CS
#[rustfmt::skip]
pub const SPECIFIC_CHARACTER_SET: Tag = Tag(0x0008, 0x0005);
/// ImageType (0008,0008) CS
#[rustfmt::skip]
pub const IMAGE_TYPE: Tag = Tag(0x0008, 0x0008);
/// InstanceCreationDate (0008,0012) DA
#[rustfmt::skip]
pub const INSTANCE_CREATION_DATE: Tag = Tag(0x0008, 0x0012);
/// InstanceCreationTime (0008,0013) TM
#[rustfmt::skip]
pub const INSTANCE_CREATION_TIME: Tag = Tag(0x0008, 0x0013);
/// SOPClassUID (0008,0016) UI
#[rustfmt::skip]
pub const SOP_CLASS_UID: Tag = Tag(0x0008, 0x0016);
/// SOPInstanceUID (0008,0018) UI
#[rustfmt::skip]
pub const SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x0018);
/// StudyDate (0008,0020) DA
#[rustfmt::skip]
pub const STUDY_DATE: Tag = Tag(0x0008, 0x0020);
/// SeriesDate (0008,0021) DA
#[rustfmt::skip]
pub const SERIES_DATE: Tag = Tag(0x0008, 0x0021);
/// AcquisitionDate (0008,0022) DA
#[rustfmt::skip]
pub const ACQUISITION_DATE: Tag = Tag(0x0008, 0x0022);
/// ContentDate (0008,0023) DA
#[rustfmt::skip]
pub const CONTENT_DATE: Tag = Tag(0x0008, 0x0023);
/// StudyTime (0008,0030) TM
#[rustfmt::skip]
pub const STUDY_TIME: Tag = Tag(0x0008, 0x0030);
/// SeriesTime (0008,0031) TM
#[rustfmt::skip]
pub const SERIES_TIME: Tag = Tag(0x0008, 0x0031);
/// ContentTime (0008,0033) TM
#[rustfmt::skip]
pub const CONTENT_TIME: Tag = Tag(0x0008, 0x0033);
/// AccessionNumber (0008,0050) SH
#[rustfmt::skip]
pub const ACCESSION_NUMBER: Tag = Tag(0x0008, 0x0050);
/// Modality (0008,0060) CS
#[rustfmt::skip]
pub const MODALITY: Tag = Tag(0x0008, 0x0060);
/// ConversionType (0008,0064) CS
#[rustfmt::skip]
pub const CONVERSION_TYPE: Tag = Tag(0x0008, 0x0064);
/// Manufacturer (0008,0070) LO
#[rustfmt::skip]
pub const MANUFACTURER: Tag = Tag(0x0008, 0x0070);
/// InstitutionName (0008,0080) LO
#[rustfmt::skip]
pub const INSTITUTION_NAME: Tag = Tag(0x0008, 0x0080);
/// ReferringPhysicianName (0008,0090) PN
#[rustfmt::skip]
pub const REFERRING_PHYSICIAN_NAME: Tag = Tag(0x0008, 0x0090);
/// CodeValue (0008,0100) SH
#[rustfmt::skip]
pub const CODE_VALUE: Tag = Tag(0x0008, 0x0100);
/// CodingSchemeDesignator (0008,0102) SH
#[rustfmt::skip]
pub const CODING_SCHEME_DESIGNATOR: Tag = Tag(0x0008, 0x0102);
/// CodeMeaning (0008,0104) LO
#[rustfmt::skip]
pub const CODE_MEANING: Tag = Tag(0x0008, 0x0104);
/// StudyDescription (0008,1030) LO
#[rustfmt::skip]
pub const STUDY_DESCRIPTION: Tag = Tag(0x0008, 0x1030);
/// SeriesDescription (0008,103E) LO
#[rustfmt::skip]
pub const SERIES_DESCRIPTION: Tag = Tag(0x0008, 0x103E);
/// ReferencedImageSequence (0008,1140) SQ
#[rustfmt::skip]
pub const REFERENCED_IMAGE_SEQUENCE: Tag = Tag(0x0008, 0x1140);
/// ReferencedSOPClassUID (0008,1150) UI
#[rustfmt::skip]
pub const REFERENCED_SOP_CLASS_UID: Tag = Tag(0x0008, 0x1150);
/// ReferencedSOPInstanceUID (0008,1155) UI
#[rustfmt::skip]
pub const REFERENCED_SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x1155);
/// DerivationDescription (0008,2111) ST
#[rustfmt::skip]
pub const DERIVATION_DESCRIPTION: Tag = Tag(0x0008, 0x2111);
/// PatientName (0010,0010) PN
#[rustfmt::skip]
pub const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);
/// PatientID (0010,0020) LO
#[rustfmt::skip]
pub const PATIENT_ID: Tag = Tag(0x0010, 0x0020);
/// PatientBirthDate (0010,0030) DA
#[rustfmt::skip]
pub const PATIENT_BIRTH_DATE: Tag = Tag(0x0010, 0x0030);
/// PatientSex (0010,0040) CS
#[rustfmt::skip]
pub const PATIENT_SEX: Tag = Tag(0x0010, 0x0040);
/// PatientAge (0010,1010) AS
#[rustfmt::skip]
pub const PATIENT_AGE: Tag = Tag(0x0010, 0x1010);
/// BodyPartExamined (0018,0015) CS
#[rustfmt::skip]
pub const BODY_PART_EXAMINED: Tag = Tag(0x0018, 0x0015);
/// SliceThickness (0018,0050) DS
#[rustfmt::skip]
pub const SLICE_THICKNESS: Tag = Tag(0x0018, 0x0050);
/// KVP (0018,0060) DS
#[rustfmt::skip]
pub const KVP: Tag = Tag(0x0018, 0x0060);
/// ProtocolName (0018,1030) LO
#[rustfmt::skip]
pub const PROTOCOL_NAME: Tag = Tag(0x0018, 0x1030);
/// StudyInstanceUID (0020,000D) UI
#[rustfmt::skip]
pub const STUDY_INSTANCE_UID: Tag = Tag(0x0020, 0x000D);
/// SeriesInstanceUID (0020,000E) UI
#[rustfmt::skip]
pub const SERIES_INSTANCE_UID: Tag = Tag(0x0020, 0x000E);
/// StudyID (0020,0010) SH
#[rustfmt::skip]
pub const STUDY_ID: Tag = Tag(0x0020, 0x0010);
/// SeriesNumber (0020,0011) IS
#[rustfmt::skip]
pub const SERIES_NUMBER: Tag = Tag(0x0020, 0x0011);
/// InstanceNumber (0020,0013) IS
#[rustfmt::skip]
pub const INSTANCE_NUMBER: Tag = Tag(0x0020, 0x0013);
/// PatientOrientation (0020,0020) CS
#[rustfmt::skip]
pub const PATIENT_ORIENTATION: Tag = Tag(0x0020, 0x0020);
/// ImagePositionPatient (0020,0032) DS
#[rustfmt::skip]
pub const IMAGE_POSITION_PATIENT: Tag = Tag(0x0020, 0x0032);
/// ImageOrientationPatient (0020,0037) DS
#[rustfmt::skip]
pub const IMAGE_ORIENTATION_PATIENT: Tag = Tag(0x0020, 0x0037);
/// FrameOfReferenceUID (0020,0052) UI
#[rustfmt::skip]
pub const FRAME_OF_REFERENCE_UID: Tag = Tag(0x0020, 0x0052);
/// SamplesPerPixel (0028,0002) US
#[rustfmt::skip]
pub const SAMPLES_PER_PIXEL: Tag = Tag(0x0028, 0x0002);
/// PhotometricInterpretation (0028,0004) CS
#[rustfmt::skip]
pub const PHOTOMETRIC_INTERPRETATION: Tag = Tag(0x0028, 0x0004);
/// PlanarConfiguration (0028,0006) US
#[rustfmt::skip]
pub const PLANAR_CONFIGURATION: Tag = Tag(0x0028, 0x0006);
/// NumberOfFrames (0028,0008) IS
#[rustfmt::skip]
pub const NUMBER_OF_FRAMES: Tag = Tag(0x0028, 0x0008);
/// FrameIncrementPointer (0028,0009) AT
#[rustfmt::skip]
pub const FRAME_INCREMENT_POINTER: Tag = Tag(0x0028, 0x0009);
/// Rows (0028,0010) US
#[rustfmt::skip]
pub const ROWS: Tag = Tag(0x0028, 0x0010);
/// Columns (0028,0011) US
#[rustfmt::skip]
pub const COLUMNS: Tag = Tag(0x0028, 0x0011);
/// PixelSpacing (0028,0030) DS
#[rustfmt::skip]
pub const PIXEL_SPACING: Tag = Tag(0x0028, 0x0030);
/// BitsAllocated (0028,0100) US
#[rustfmt::skip]
pub const BITS_ALLOCATED: Tag = Tag(0x0028, 0x0100);
/// BitsStored (0028,0101) US
#[rustfmt::skip]
pub const BITS_STORED: Tag = Tag(0x0028, 0x0101);
/// HighBit (0028,0102) US
#[rustfmt::skip]
pub const HIGH_BIT: Tag = Tag(0x0028, 0x0102);
/// PixelRepresentation (0028,0103) US
#[rustfmt::skip]
pub const PIXEL_REPRESENTATION: Tag = Tag(0x0028, 0x0103);
/// SmallestImagePixelValue (0028,0106) US
#[rustfmt::skip]
pub const SMALLEST_IMAGE_PIXEL_VALUE: Tag = Tag(0x0028, 0x0106);
/// LargestImagePixelValue (0028,0107) US
#[rustfmt::skip]
pub const LARGEST_IMAGE_PIXEL_VALUE: Tag = Tag(0x0028, 0x0107);
/// WindowCenter (0028,1050) DS
#[rustfmt::skip]
pub const WINDOW_CENTER: Tag = Tag(0x0028, 0x1050);
/// WindowWidth (0028,1051) DS
#[rustfmt::skip]
pub const WINDOW_WIDTH: Tag = Tag(0x0028, 0x1051);
/// RescaleIntercept (0028,1052) DS
#[rustfmt::skip]
pub const RESCALE_INTERCEPT: Tag = Tag(0x0028, 0x1052);
/// RescaleSlope (0028,1053) DS
#[rustfmt::skip]
pub const RESCALE_SLOPE: Tag = Tag(0x0028, 0x1053);
/// RedPaletteColorLookupTableDescriptor (0028,1101) US
#[rustfmt::skip]
pub const RED_PALETTE_COLOR_LOOKUP_TABLE_DESCRIPTOR: Tag = Tag(0x0028, 0x1101);
/// GreenPaletteColorLookupTableDescriptor (0028,1102) US
#[rustfmt::skip]
pub const GREEN_PALETTE_COLOR_LOOKUP_TABLE_DESCRIPTOR: Tag = Tag(0x0028, 0x1102);
/// BluePaletteColorLookupTableDescriptor (0028,1103) US
#[rustfmt::skip]
pub const BLUE_PALETTE_COLOR_LOOKUP_TABLE_DESCRIPTOR: Tag = Tag(0x0028, 0x1103);
/// PaletteColorLookupTableUID (0028,1199) UI
#[rustfmt::skip]
pub const PALETTE_COLOR_LOOKUP_TABLE_UID: Tag = Tag(0x0028, 0x1199);
/// RedPaletteColorLookupTableData (0028,1201) OW
#[rustfmt::skip]
pub const RED_PALETTE_COLOR_LOOKUP_TABLE_DATA: Tag = Tag(0x0028, 0x1201);
/// GreenPaletteColorLookupTableData (0028,1202) OW
#[rustfmt::skip]
pub const GREEN_PALETTE_COLOR_LOOKUP_TABLE_DATA: Tag = Tag(0x0028, 0x1202);
/// BluePaletteColorLookupTableData (0028,1203) OW
#[rustfmt::skip]
pub const BLUE_PALETTE_COLOR_LOOKUP_TABLE_DATA: Tag = Tag(0x0028, 0x1203);
/// SegmentedRedPaletteColorLookupTableData (0028,1221) OW
#[rustfmt::skip]
pub const SEGMENTED_RED_PALETTE_COLOR_LOOKUP_TABLE_DATA: Tag = Tag(0x0028, 0x1221);
/// SegmentedGreenPaletteColorLookupTableData (0028,1222) OW
#[rustfmt::skip]
pub const SEGMENTED_GREEN_PALETTE_COLOR_LOOKUP_TABLE_DATA: Tag = Tag(0x0028, 0x1222);
/// SegmentedBluePaletteColorLookupTableData (0028,1223) OW
#[rustfmt::skip]
pub const SEGMENTED_BLUE_PALETTE_COLOR_LOOKUP_TABLE_DATA: Tag = Tag(0x0028, 0x1223);
/// LossyImageCompression (0028,2110) CS
#[rustfmt::skip]
pub const LOSSY_IMAGE_COMPRESSION: Tag = Tag(0x0028, 0x2110);
/// LossyImageCompressionRatio (0028,2112) DS
#[rustfmt::skip]
pub const LOSSY_IMAGE_COMPRESSION_RATIO: Tag = Tag(0x0028, 0x2112);
/// LossyImageCompressionMethod (0028,2114) CS
#[rustfmt::skip]
pub const LOSSY_IMAGE_COMPRESSION_METHOD: Tag = Tag(0x0028, 0x2114);
/// LUTDescriptor (0028,3002) US
#[rustfmt::skip]
pub const LUT_DESCRIPTOR: Tag = Tag(0x0028, 0x3002);
/// LUTData (0028,3006) US
#[rustfmt::skip]
pub const LUT_DATA: Tag = Tag(0x0028, 0x3006);
/// PixelDataProviderURL (0028,7FE0) UR
#[rustfmt::skip]
pub const PIXEL_DATA_PROVIDER_URL: Tag = Tag(0x0028, 0x7FE0);
/// ContentSequence (0040,A730) SQ
#[rustfmt::skip]
pub const CONTENT_SEQUENCE: Tag = Tag(0x0040, 0xA730);
/// ValueType (0040,A040) CS
#[rustfmt::skip]
pub const VALUE_TYPE: Tag = Tag(0x0040, 0xA040);
/// ConceptNameCodeSequence (0040,A043) SQ
#[rustfmt::skip]
pub const CONCEPT_NAME_CODE_SEQUENCE: Tag = Tag(0x0040, 0xA043);
/// TextValue (0040,A160) UT
#[rustfmt::skip]
pub const TEXT_VALUE: Tag = Tag(0x0040, 0xA160);
/// EncapsulatedDocument (0042,0011) OB
#[rustfmt::skip]
pub const ENCAPSULATED_DOCUMENT: Tag = Tag(0x0042, 0x0011);
/// MIMETypeOfEncapsulatedDocument (0042,0012) LO
#[rustfmt::skip]
pub const MIME_TYPE_OF_ENCAPSULATED_DOCUMENT: Tag = Tag(0x0042, 0x0012);
/// CurveDimensions (5000,0005) US
#[rustfmt::skip]
pub const CURVE_DIMENSIONS: Tag = Tag(0x5000, 0x0005);
/// NumberOfPoints (5000,0010) US
#[rustfmt::skip]
pub const NUMBER_OF_POINTS: Tag = Tag(0x5000, 0x0010);
/// AudioSampleData (5000,200C) OB
#[rustfmt::skip]
pub const AUDIO_SAMPLE_DATA: Tag = Tag(0x5000, 0x200C);
/// CurveData (5000,3000) OB
#[rustfmt::skip]
pub const CURVE_DATA: Tag = Tag(0x5000, 0x3000);
/// WaveformSequence (5400,0100) SQ
#[rustfmt::skip]
pub const WAVEFORM_SEQUENCE: Tag = Tag(0x5400, 0x0100);
/// WaveformBitsAllocated (5400,1004) US
#[rustfmt::skip]
pub const WAVEFORM_BITS_ALLOCATED: Tag = Tag(0x5400, 0x1004);
/// WaveformSampleInterpretation (5400,1006) CS
#[rustfmt::skip]
pub const WAVEFORM_SAMPLE_INTERPRETATION: Tag = Tag(0x5400, 0x1006);
/// WaveformData (5400,1010) OB
#[rustfmt::skip]
pub const WAVEFORM_DATA: Tag = Tag(0x5400, 0x1010);
/// FirstOrderPhaseCorrectionAngle (5600,0010) OF
#[rustfmt::skip]
pub const FIRST_ORDER_PHASE_CORRECTION_ANGLE: Tag = Tag(0x5600, 0x0010);
/// SpectroscopyData (5600,0020) OF
#[rustfmt::skip]
pub const SPECTROSCOPY_DATA: Tag = Tag(0x5600, 0x0020);
/// OverlayRows (6000,0010) US
#[rustfmt::skip]
pub const OVERLAY_ROWS: Tag = Tag(0x6000, 0x0010);
/// OverlayColumns (6000,0011) US
#[rustfmt::skip]
pub const OVERLAY_COLUMNS: Tag = Tag(0x6000, 0x0011);
/// NumberOfFramesInOverlay (6000,0015) IS
#[rustfmt::skip]
pub const NUMBER_OF_FRAMES_IN_OVERLAY: Tag = Tag(0x6000, 0x0015);
/// OverlayDescription (6000,0022) LO
#[rustfmt::skip]
pub const OVERLAY_DESCRIPTION: Tag = Tag(0x6000, 0x0022);
/// OverlayType (6000,0040) CS
#[rustfmt::skip]
pub const OVERLAY_TYPE: Tag = Tag(0x6000, 0x0040);
/// OverlayOrigin (6000,0050) SS
#[rustfmt::skip]
pub const OVERLAY_ORIGIN: Tag = Tag(0x6000, 0x0050);
/// ImageFrameOrigin (6000,0051) US
#[rustfmt::skip]
pub const IMAGE_FRAME_ORIGIN: Tag = Tag(0x6000, 0x0051);
/// OverlayBitsAllocated (6000,0100) US
#[rustfmt::skip]
pub const OVERLAY_BITS_ALLOCATED: Tag = Tag(0x6000, 0x0100);
/// OverlayBitPosition (6000,0102) US
#[rustfmt::skip]
pub const OVERLAY_BIT_POSITION: Tag = Tag(0x6000, 0x0102);
/// OverlayData (6000,3000) OB
#[rustfmt::skip]
pub const OVERLAY_DATA: Tag = Tag(0x6000, 0x3000);
/// ExtendedOffsetTable (7FE0,0001) OV
#[rustfmt::skip]
pub const EXTENDED_OFFSET_TABLE: Tag = Tag(0x7FE0, 0x0001);
/// ExtendedOffsetTableLengths (7FE0,0002) OV
#[rustfmt::skip]
pub const EXTENDED_OFFSET_TABLE_LENGTHS: Tag = Tag(0x7FE0, 0x0002);
/// FloatPixelData (7FE0,0008) OF
#[rustfmt::skip]
pub const FLOAT_PIXEL_DATA: Tag = Tag(0x7FE0, 0x0008);
/// DoubleFloatPixelData (7FE0,0009) OD
#[rustfmt::skip]
pub const DOUBLE_FLOAT_PIXEL_DATA: Tag = Tag(0x7FE0, 0x0009);
/// PixelData (7FE0,0010) OB
#[rustfmt::skip]
pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);
/// DigitalSignaturesSequence (FFFA,FFFA) SQ
#[rustfmt::skip]
pub const DIGITAL_SIGNATURES_SEQUENCE: Tag = Tag(0xFFFA, 0xFFFA);
/// DataSetTrailingPadding (FFFC,FFFC) OB
#[rustfmt::skip]
pub const DATA_SET_TRAILING_PADDING: Tag = Tag(0xFFFC, 0xFFFC);
/// Item (FFFE,E000) UN
#[rustfmt::skip]
pub const ITEM: Tag = Tag(0xFFFE, 0xE000);
/// ItemDelimitationItem (FFFE,E00D) UN
#[rustfmt::skip]
pub const ITEM_DELIMITATION_ITEM: Tag = Tag(0xFFFE, 0xE00D);
/// SequenceDelimitationItem (FFFE,E0DD) UN
#[rustfmt::skip]
pub const SEQUENCE_DELIMITATION_ITEM: Tag = Tag(0xFFFE, 0xE0DD);

type E = DictionaryEntryRef<'static>;

#[rustfmt::skip]
pub(crate) const ENTRIES: &[E] = &[
    E { tag: FILE_META_INFORMATION_GROUP_LENGTH, alias: "FileMetaInformationGroupLength", vr: VR::UL },
    E { tag: FILE_META_INFORMATION_VERSION, alias: "FileMetaInformationVersion", vr: VR::OB },
    E { tag: MEDIA_STORAGE_SOP_CLASS_UID, alias: "MediaStorageSOPClassUID", vr: VR::UI },
    E { tag: MEDIA_STORAGE_SOP_INSTANCE_UID, alias: "MediaStorageSOPInstanceUID", vr: VR::UI },
    E { tag: TRANSFER_SYNTAX_UID, alias: "TransferSyntaxUID", vr: VR::UI },
    E { tag: IMPLEMENTATION_CLASS_UID, alias: "ImplementationClassUID", vr: VR::UI },
    E { tag: IMPLEMENTATION_VERSION_NAME, alias: "ImplementationVersionName", vr: VR::SH },
    E { tag: SOURCE_APPLICATION_ENTITY_TITLE, alias: "SourceApplicationEntityTitle", vr: VR::AE },
    E { tag: PRIVATE_INFORMATION_CREATOR_UID, alias: "PrivateInformationCreatorUID", vr: VR::UI },
    E { tag: PRIVATE_INFORMATION, alias: "PrivateInformation", vr: VR::OB },
    E { tag: SPECIFIC_CHARACTER_SET, alias: "SpecificCharacterSet", vr: VR::CS },
    E { tag: IMAGE_TYPE, alias: "ImageType", vr: VR::CS },
    E { tag: INSTANCE_CREATION_DATE, alias: "InstanceCreationDate", vr: VR::DA },
    E { tag: INSTANCE_CREATION_TIME, alias: "InstanceCreationTime", vr: VR::TM },
    E { tag: SOP_CLASS_UID, alias: "SOPClassUID", vr: VR::UI },
    E { tag: SOP_INSTANCE_UID, alias: "SOPInstanceUID", vr: VR::UI },
    E { tag: STUDY_DATE, alias: "StudyDate", vr: VR::DA },
    E { tag: SERIES_DATE, alias: "SeriesDate", vr: VR::DA },
    E { tag: ACQUISITION_DATE, alias: "AcquisitionDate", vr: VR::DA },
    E { tag: CONTENT_DATE, alias: "ContentDate", vr: VR::DA },
    E { tag: STUDY_TIME, alias: "StudyTime", vr: VR::TM },
    E { tag: SERIES_TIME, alias: "SeriesTime", vr: VR::TM },
    E { tag: CONTENT_TIME, alias: "ContentTime", vr: VR::TM },
    E { tag: ACCESSION_NUMBER, alias: "AccessionNumber", vr: VR::SH },
    E { tag: MODALITY, alias: "Modality", vr: VR::CS },
    E { tag: CONVERSION_TYPE, alias: "ConversionType", vr: VR::CS },
    E { tag: MANUFACTURER, alias: "Manufacturer", vr: VR::LO },
    E { tag: INSTITUTION_NAME, alias: "InstitutionName", vr: VR::LO },
    E { tag: REFERRING_PHYSICIAN_NAME, alias: "ReferringPhysicianName", vr: VR::PN },
    E { tag: CODE_VALUE, alias: "CodeValue", vr: VR::SH },
    E { tag: CODING_SCHEME_DESIGNATOR, alias: "CodingSchemeDesignator", vr: VR::SH },
    E { tag: CODE_MEANING, alias: "CodeMeaning", vr: VR::LO },
    E { tag: STUDY_DESCRIPTION, alias: "StudyDescription", vr: VR::LO },
    E { tag: SERIES_DESCRIPTION, alias: "SeriesDescription", vr: VR::LO },
    E { tag: REFERENCED_IMAGE_SEQUENCE, alias: "ReferencedImageSequence", vr: VR::SQ },
    E { tag: REFERENCED_SOP_CLASS_UID, alias: "ReferencedSOPClassUID", vr: VR::UI },
    E { tag: REFERENCED_SOP_INSTANCE_UID, alias: "ReferencedSOPInstanceUID", vr: VR::UI },
    E { tag: DERIVATION_DESCRIPTION, alias: "DerivationDescription", vr: VR::ST },
    E { tag: PATIENT_NAME, alias: "PatientName", vr: VR::PN },
    E { tag: PATIENT_ID, alias: "PatientID", vr: VR::LO },
    E { tag: PATIENT_BIRTH_DATE, alias: "PatientBirthDate", vr: VR::DA },
    E { tag: PATIENT_SEX, alias: "PatientSex", vr: VR::CS },
    E { tag: PATIENT_AGE, alias: "PatientAge", vr: VR::AS },
    E { tag: BODY_PART_EXAMINED, alias: "BodyPartExamined", vr: VR::CS },
    E { tag: SLICE_THICKNESS, alias: "SliceThickness", vr: VR::DS },
    E { tag: KVP, alias: "KVP", vr: VR::DS },
    E { tag: PROTOCOL_NAME, alias: "ProtocolName", vr: VR::LO },
    E { tag: STUDY_INSTANCE_UID, alias: "StudyInstanceUID", vr: VR::UI },
    E { tag: SERIES_INSTANCE_UID, alias: "SeriesInstanceUID", vr: VR::UI },
    E { tag: STUDY_ID, alias: "StudyID", vr: VR::SH },
    E { tag: SERIES_NUMBER, alias: "SeriesNumber", vr: VR::IS },
    E { tag: INSTANCE_NUMBER, alias: "InstanceNumber", vr: VR::IS },
    E { tag: PATIENT_ORIENTATION, alias: "PatientOrientation", vr: VR::CS },
    E { tag: IMAGE_POSITION_PATIENT, alias: "ImagePositionPatient", vr: VR::DS },
    E { tag: IMAGE_ORIENTATION_PATIENT, alias: "ImageOrientationPatient", vr: VR::DS },
    E { tag: FRAME_OF_REFERENCE_UID, alias: "FrameOfReferenceUID", vr: VR::UI },
    E { tag: SAMPLES_PER_PIXEL, alias: "SamplesPerPixel", vr: VR::US },
    E { tag: PHOTOMETRIC_INTERPRETATION, alias: "PhotometricInterpretation", vr: VR::CS },
    E { tag: PLANAR_CONFIGURATION, alias: "PlanarConfiguration", vr: VR::US },
    E { tag: NUMBER_OF_FRAMES, alias: "NumberOfFrames", vr: VR::IS },
    E { tag: FRAME_INCREMENT_POINTER, alias: "FrameIncrementPointer", vr: VR::AT },
    E { tag: ROWS, alias: "Rows", vr: VR::US },
    E { tag: COLUMNS, alias: "Columns", vr: VR::US },
    E { tag: PIXEL_SPACING, alias: "PixelSpacing", vr: VR::DS },
    E { tag: BITS_ALLOCATED, alias: "BitsAllocated", vr: VR::US },
    E { tag: BITS_STORED, alias: "BitsStored", vr: VR::US },
    E { tag: HIGH_BIT, alias: "HighBit", vr: VR::US },
    E { tag: PIXEL_REPRESENTATION, alias: "PixelRepresentation", vr: VR::US },
    E { tag: SMALLEST_IMAGE_PIXEL_VALUE, alias: "SmallestImagePixelValue", vr: VR::US },
    E { tag: LARGEST_IMAGE_PIXEL_VALUE, alias: "LargestImagePixelValue", vr: VR::US },
    E { tag: WINDOW_CENTER, alias: "WindowCenter", vr: VR::DS },
    E { tag: WINDOW_WIDTH, alias: "WindowWidth", vr: VR::DS },
    E { tag: RESCALE_INTERCEPT, alias: "RescaleIntercept", vr: VR::DS },
    E { tag: RESCALE_SLOPE, alias: "RescaleSlope", vr: VR::DS },
    E { tag: RED_PALETTE_COLOR_LOOKUP_TABLE_DESCRIPTOR, alias: "RedPaletteColorLookupTableDescriptor", vr: VR::US },
    E { tag: GREEN_PALETTE_COLOR_LOOKUP_TABLE_DESCRIPTOR, alias: "GreenPaletteColorLookupTableDescriptor", vr: VR::US },
    E { tag: BLUE_PALETTE_COLOR_LOOKUP_TABLE_DESCRIPTOR, alias: "BluePaletteColorLookupTableDescriptor", vr: VR::US },
    E { tag: PALETTE_COLOR_LOOKUP_TABLE_UID, alias: "PaletteColorLookupTableUID", vr: VR::UI },
    E { tag: RED_PALETTE_COLOR_LOOKUP_TABLE_DATA, alias: "RedPaletteColorLookupTableData", vr: VR::OW },
    E { tag: GREEN_PALETTE_COLOR_LOOKUP_TABLE_DATA, alias: "GreenPaletteColorLookupTableData", vr: VR::OW },
    E { tag: BLUE_PALETTE_COLOR_LOOKUP_TABLE_DATA, alias: "BluePaletteColorLookupTableData", vr: VR::OW },
    E { tag: SEGMENTED_RED_PALETTE_COLOR_LOOKUP_TABLE_DATA, alias: "SegmentedRedPaletteColorLookupTableData", vr: VR::OW },
    E { tag: SEGMENTED_GREEN_PALETTE_COLOR_LOOKUP_TABLE_DATA, alias: "SegmentedGreenPaletteColorLookupTableData", vr: VR::OW },
    E { tag: SEGMENTED_BLUE_PALETTE_COLOR_LOOKUP_TABLE_DATA, alias: "SegmentedBluePaletteColorLookupTableData", vr: VR::OW },
    E { tag: LOSSY_IMAGE_COMPRESSION, alias: "LossyImageCompression", vr: VR::CS },
    E { tag: LOSSY_IMAGE_COMPRESSION_RATIO, alias: "LossyImageCompressionRatio", vr: VR::DS },
    E { tag: LOSSY_IMAGE_COMPRESSION_METHOD, alias: "LossyImageCompressionMethod", vr: VR::CS },
    E { tag: LUT_DESCRIPTOR, alias: "LUTDescriptor", vr: VR::US },
    E { tag: LUT_DATA, alias: "LUTData", vr: VR::US },
    E { tag: PIXEL_DATA_PROVIDER_URL, alias: "PixelDataProviderURL", vr: VR::UR },
    E { tag: CONTENT_SEQUENCE, alias: "ContentSequence", vr: VR::SQ },
    E { tag: VALUE_TYPE, alias: "ValueType", vr: VR::CS },
    E { tag: CONCEPT_NAME_CODE_SEQUENCE, alias: "ConceptNameCodeSequence", vr: VR::SQ },
    E { tag: TEXT_VALUE, alias: "TextValue", vr: VR::UT },
    E { tag: ENCAPSULATED_DOCUMENT, alias: "EncapsulatedDocument", vr: VR::OB },
    E { tag: MIME_TYPE_OF_ENCAPSULATED_DOCUMENT, alias: "MIMETypeOfEncapsulatedDocument", vr: VR::LO },
    E { tag: CURVE_DIMENSIONS, alias: "CurveDimensions", vr: VR::US },
    E { tag: NUMBER_OF_POINTS, alias: "NumberOfPoints", vr: VR::US },
    E { tag: AUDIO_SAMPLE_DATA, alias: "AudioSampleData", vr: VR::OB },
    E { tag: CURVE_DATA, alias: "CurveData", vr: VR::OB },
    E { tag: WAVEFORM_SEQUENCE, alias: "WaveformSequence", vr: VR::SQ },
    E { tag: WAVEFORM_BITS_ALLOCATED, alias: "WaveformBitsAllocated", vr: VR::US },
    E { tag: WAVEFORM_SAMPLE_INTERPRETATION, alias: "WaveformSampleInterpretation", vr: VR::CS },
    E { tag: WAVEFORM_DATA, alias: "WaveformData", vr: VR::OB },
    E { tag: FIRST_ORDER_PHASE_CORRECTION_ANGLE, alias: "FirstOrderPhaseCorrectionAngle", vr: VR::OF },
    E { tag: SPECTROSCOPY_DATA, alias: "SpectroscopyData", vr: VR::OF },
    E { tag: OVERLAY_ROWS, alias: "OverlayRows", vr: VR::US },
    E { tag: OVERLAY_COLUMNS, alias: "OverlayColumns", vr: VR::US },
    E { tag: NUMBER_OF_FRAMES_IN_OVERLAY, alias: "NumberOfFramesInOverlay", vr: VR::IS },
    E { tag: OVERLAY_DESCRIPTION, alias: "OverlayDescription", vr: VR::LO },
    E { tag: OVERLAY_TYPE, alias: "OverlayType", vr: VR::CS },
    E { tag: OVERLAY_ORIGIN, alias: "OverlayOrigin", vr: VR::SS },
    E { tag: IMAGE_FRAME_ORIGIN, alias: "ImageFrameOrigin", vr: VR::US },
    E { tag: OVERLAY_BITS_ALLOCATED, alias: "OverlayBitsAllocated", vr: VR::US },
    E { tag: OVERLAY_BIT_POSITION, alias: "OverlayBitPosition", vr: VR::US },
    E { tag: OVERLAY_DATA, alias: "OverlayData", vr: VR::OB },
    E { tag: EXTENDED_OFFSET_TABLE, alias: "ExtendedOffsetTable", vr: VR::OV },
    E { tag: EXTENDED_OFFSET_TABLE_LENGTHS, alias: "ExtendedOffsetTableLengths", vr: VR::OV },
    E { tag: FLOAT_PIXEL_DATA, alias: "FloatPixelData", vr: VR::OF },
    E { tag: DOUBLE_FLOAT_PIXEL_DATA, alias: "DoubleFloatPixelData", vr: VR::OD },
    E { tag: PIXEL_DATA, alias: "PixelData", vr: VR::OB },
    E { tag: DIGITAL_SIGNATURES_SEQUENCE, alias: "DigitalSignaturesSequence", vr: VR::SQ },
    E { tag: DATA_SET_TRAILING_PADDING, alias: "DataSetTrailingPadding", vr: VR::OB },
    E { tag: ITEM, alias: "Item", vr: VR::UN },
    E { tag: ITEM_DELIMITATION_ITEM, alias: "ItemDelimitationItem", vr: VR::UN },
    E { tag: SEQUENCE_DELIMITATION_ITEM, alias: "SequenceDelimitationItem", vr: VR::UN },
];
