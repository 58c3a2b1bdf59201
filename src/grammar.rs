use super::*;

const LANGUAGE: &str = "(?:[a-z]{2,3}|[a-z]{5,8}|root)";
const SCRIPT: &str = "[a-z]{4}";
const REGION: &str = "(?:[a-z]{2}|[0-9]{3})";
const VARIANT: &str = "(?:[a-z0-9]{5,8}|[0-9][a-z0-9]{3})";
const LEGACY_VARIANT: &str = "(?:min-nan|be-fr|be-nl|ch-de)";

pub(crate) const LEGACY_VARIANTS: [&str; 4] = ["min-nan", "be-fr", "be-nl", "ch-de"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Language,
    Script,
    Region,
    Variant,
    Attribute,
    UnicodeKey,
    UnicodeType,
    TransformLanguage,
    TransformKey,
    TransformValue,
    Singleton,
    ExtensionValue,
    PrivateUse,
}

impl Field {
    const COUNT: usize = 13;

    pub fn name(self) -> &'static str {
        match self {
            Self::Language => "language",
            Self::Script => "script",
            Self::Region => "region",
            Self::Variant => "variant",
            Self::Attribute => "attribute",
            Self::UnicodeKey => "unicode extension key",
            Self::UnicodeType => "unicode extension type",
            Self::TransformLanguage => "transform language",
            Self::TransformKey => "transform extension key",
            Self::TransformValue => "transform extension value",
            Self::Singleton => "extension singleton",
            Self::ExtensionValue => "extension value",
            Self::PrivateUse => "private use",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn pattern(self) -> String {
        match self {
            Self::Language => LANGUAGE.to_string(),
            Self::Script => SCRIPT.to_string(),
            Self::Region => REGION.to_string(),
            Self::Variant => format!("(?:{VARIANT}|{LEGACY_VARIANT})"),
            Self::Attribute => "[a-z0-9]{3,8}".to_string(),
            Self::UnicodeKey => "[a-z0-9][a-z]".to_string(),
            Self::UnicodeType => "(?:|true|[a-z0-9]{3,8}(?:-[a-z0-9]{3,8})*)".to_string(),
            Self::TransformLanguage => {
                format!("{LANGUAGE}(?:-{SCRIPT})?(?:-{REGION})?(?:-{VARIANT})*")
            }
            Self::TransformKey => "[a-z][0-9]".to_string(),
            Self::TransformValue => "[a-z0-9]{3,8}(?:-[a-z0-9]{3,8})*".to_string(),
            Self::Singleton => "[0-9a-wyz]".to_string(),
            Self::ExtensionValue => "[a-z0-9]{2,8}(?:-[a-z0-9]{2,8})*".to_string(),
            Self::PrivateUse => "[a-z0-9]{1,8}(?:-[a-z0-9]{1,8})*".to_string(),
        }
    }

    pub fn is_valid(self, value: &str) -> bool {
        self.validate(value).is_ok()
    }

    pub(crate) fn validate(self, value: &str) -> Result<()> {
        static PATTERNS: [OnceLock<std::result::Result<Pattern, PatternError>>; Field::COUNT] =
            [const { OnceLock::new() }; Field::COUNT];

        let pattern = PATTERNS[self.index()]
            .get_or_init(|| Pattern::anchored(&self.pattern()))
            .as_ref()
            .map_err(|err| Error::Format(err.to_string()))?;
        let normalized = normalize_separators(value);
        if pattern.is_match(&normalized)? {
            Ok(())
        } else {
            Err(Error::InvalidField {
                field: self,
                value: value.to_string(),
            })
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) fn normalize_separators(value: &str) -> String {
    value.trim().replace('_', "-").to_ascii_lowercase()
}

pub(crate) fn title_case(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => format!(
            "{}{}",
            first.to_ascii_uppercase(),
            chars.as_str().to_ascii_lowercase()
        ),
        None => String::new(),
    }
}

pub(crate) fn is_unicode_key(subtag: &str) -> bool {
    let bytes = subtag.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphanumeric() && bytes[1].is_ascii_alphabetic()
}

pub(crate) fn is_transform_key(subtag: &str) -> bool {
    let bytes = subtag.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1].is_ascii_digit()
}

pub(crate) fn is_language_subtag(subtag: &str) -> bool {
    let len = subtag.len();
    (len == 2 || len == 3 || (5..=8).contains(&len))
        && subtag.chars().all(|ch| ch.is_ascii_alphabetic())
}

/// Head captures of a tag matched against the full grammar. Extension and
/// private-use runs are returned raw, without their leading separator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TagMatch {
    pub(crate) language: String,
    pub(crate) script: Option<String>,
    pub(crate) region: Option<String>,
    pub(crate) variants: Vec<String>,
    pub(crate) extensions: Option<String>,
    pub(crate) private_use: Option<String>,
}

pub(crate) fn match_tag(normalized: &str) -> Result<Option<TagMatch>> {
    static TAG: OnceLock<std::result::Result<Pattern, PatternError>> = OnceLock::new();

    let pattern = TAG
        .get_or_init(|| {
            Pattern::anchored(&format!(
                "(?P<language>{LANGUAGE})\
                 (?:-(?P<script>{SCRIPT}))?\
                 (?:-(?P<region>{REGION}))?\
                 (?P<variants>(?:-(?:{VARIANT}|{LEGACY_VARIANT}))*)\
                 (?P<extensions>(?:-[0-9a-wyz](?:-[a-z0-9]{{2,8}})+)*)\
                 (?:-x(?P<private>(?:-[a-z0-9]{{1,8}})+))?"
            ))
        })
        .as_ref()
        .map_err(|err| Error::Format(err.to_string()))?;

    let Some(captures) = pattern.captures(normalized)? else {
        return Ok(None);
    };
    let group = |name: &str| {
        captures
            .name(name)
            .map(|m| m.as_str().to_string())
            .filter(|text| !text.is_empty())
    };

    Ok(Some(TagMatch {
        language: group("language").unwrap_or_default(),
        script: group("script"),
        region: group("region"),
        variants: group("variants")
            .map(|run| split_variants(&run))
            .unwrap_or_default(),
        extensions: group("extensions").map(|run| run.trim_start_matches('-').to_string()),
        private_use: group("private").map(|run| run.trim_start_matches('-').to_string()),
    }))
}

fn split_variants(run: &str) -> Vec<String> {
    let subtags = run.split('-').filter(|s| !s.is_empty()).collect::<Vec<_>>();
    let mut out = Vec::with_capacity(subtags.len());
    let mut idx = 0usize;
    while idx < subtags.len() {
        if idx + 1 < subtags.len() {
            let joined = format!("{}-{}", subtags[idx], subtags[idx + 1]);
            if LEGACY_VARIANTS.contains(&joined.as_str()) {
                out.push(joined);
                idx += 2;
                continue;
            }
        }
        out.push(subtags[idx].to_string());
        idx += 1;
    }
    out
}

/// Byte ranges of every `-u-...` run in `normalized`, stopping at the next
/// singleton.
pub(crate) fn unicode_extension_runs(normalized: &str) -> Result<Vec<(usize, usize)>> {
    static UNICODE_RUN: OnceLock<std::result::Result<Pattern, PatternError>> = OnceLock::new();

    let pattern = UNICODE_RUN
        .get_or_init(|| Pattern::new("-u(?:-[a-z0-9]{2,8})+(?=-[a-z0-9](?:-|$)|$)"))
        .as_ref()
        .map_err(|err| Error::Format(err.to_string()))?;
    Ok(pattern
        .find_all(normalized)?
        .into_iter()
        .map(|m| (m.start(), m.end()))
        .collect())
}

#[derive(Debug, Clone)]
pub(crate) struct Pattern {
    backend: fancy_regex::Regex,
}

impl Pattern {
    pub(crate) fn new(pattern: &str) -> std::result::Result<Self, PatternError> {
        let backend = fancy_regex::Regex::new(pattern).map_err(PatternError::from)?;
        Ok(Self { backend })
    }

    pub(crate) fn anchored(pattern: &str) -> std::result::Result<Self, PatternError> {
        Self::new(&format!("^(?:{pattern})$"))
    }

    pub(crate) fn is_match(&self, input: &str) -> Result<bool> {
        self.backend
            .is_match(input)
            .map_err(|err| Error::Format(PatternError::from(err).to_string()))
    }

    pub(crate) fn captures(&self, input: &str) -> Result<Option<Captures>> {
        let captures = self
            .backend
            .captures(input)
            .map_err(|err| Error::Format(PatternError::from(err).to_string()))?;
        Ok(captures
            .as_ref()
            .map(|captures| Captures::from_backend(&self.backend, captures)))
    }

    pub(crate) fn find_all(&self, input: &str) -> Result<Vec<Match>> {
        let mut out = Vec::new();
        for matched in self.backend.find_iter(input) {
            let matched =
                matched.map_err(|err| Error::Format(PatternError::from(err).to_string()))?;
            out.push(Match::from_backend(matched));
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Captures {
    named: Vec<(String, Option<Match>)>,
}

impl Captures {
    fn from_backend(regex: &fancy_regex::Regex, captures: &fancy_regex::Captures<'_>) -> Self {
        let named = regex
            .capture_names()
            .flatten()
            .map(|name| (name.to_string(), captures.name(name).map(Match::from_backend)))
            .collect();
        Self { named }
    }

    pub(crate) fn name(&self, name: &str) -> Option<&Match> {
        self.named
            .iter()
            .find(|(group, _)| group == name)
            .and_then(|(_, matched)| matched.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Match {
    start: usize,
    end: usize,
    text: String,
}

impl Match {
    fn from_backend(matched: fancy_regex::Match<'_>) -> Self {
        Self {
            start: matched.start(),
            end: matched.end(),
            text: matched.as_str().to_string(),
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        self.text.as_str()
    }

    pub(crate) fn start(&self) -> usize {
        self.start
    }

    pub(crate) fn end(&self) -> usize {
        self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PatternError {
    message: String,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for PatternError {}

impl From<fancy_regex::Error> for PatternError {
    fn from(value: fancy_regex::Error) -> Self {
        Self {
            message: value.to_string(),
        }
    }
}
