//! Constants used throughout the MDM core crate.
//!
//! Scoring weights, billing codes and placeholder text live here so the detector and the
//! generators stay consistent with each other.

/// Score contributed by each matching detection pattern.
pub const PATTERN_WEIGHT: u32 = 10;

/// Minimum score for a condition to be selected (one full pattern match).
pub const MIN_DETECTION_SCORE: u32 = PATTERN_WEIGHT;

/// Leading character of every command alias (for example `.pf`).
pub const COMMAND_MARKER: char = '.';

/// Free-text input shorter than this is not analysed by the engine surface.
pub const MIN_FREE_TEXT_CHARS: usize = 16;

/// E&M visit code for low-complexity medical decision making.
pub const EM_LOW_COMPLEXITY: &str = "99213";

/// E&M visit code for moderate-complexity medical decision making.
pub const EM_MODERATE_COMPLEXITY: &str = "99214";

/// EPAT sessions in a standard treatment series.
pub const EPAT_SERIES_LENGTH: u32 = 5;

/// CPT code for plantar fascia extracorporeal shockwave treatment.
pub const EPAT_PLANTAR_FASCIA_CODE: &str = "28890";

/// CPT code for extracorporeal shockwave treatment of other musculoskeletal sites.
pub const EPAT_OTHER_CODE: &str = "0101T";

/// Selective debridement, first 20 sq cm or less.
pub const DEBRIDEMENT_FIRST_CODE: &str = "97597";

/// Selective debridement, each additional 20 sq cm.
pub const DEBRIDEMENT_ADDITIONAL_CODE: &str = "97598";

/// Surface area covered by the first debridement code, in sq cm.
pub const DEBRIDEMENT_AREA_INCREMENT: f64 = 20.0;

/// Hallux valgus angle below which the deformity is mild.
pub const HVA_MODERATE_THRESHOLD: f64 = 20.0;

/// Hallux valgus angle above which the deformity is severe.
pub const HVA_SEVERE_THRESHOLD: f64 = 40.0;

/// Intermetatarsal angle above which a first-ray fusion procedure is favoured.
pub const IMA_FUSION_THRESHOLD: f64 = 15.0;

/// Default injection and EPAT sequence number when the text has no ordinal.
pub const DEFAULT_SEQUENCE: &str = "1";

pub const LATERALITY_PLACEHOLDER: &str = "[laterality]";
pub const DURATION_PLACEHOLDER: &str = "[duration]";
