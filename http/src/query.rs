//! A percent-decoded key-value multimap shared by the query and form
//! scanners.

use recast_core::SourceError;

/// An ordered multimap of decoded `key=value` pairs.
#[derive(Debug, Clone, Default)]
pub struct ValueMap {
    pairs: Vec<(String, String)>,
}

impl ValueMap {
    /// Parse a `k=v&k2=v2` string, percent-decoding keys and values and
    /// treating `+` as a space. A segment without `=` becomes a key with an
    /// empty value.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] when a percent escape does not decode to
    /// valid UTF-8.
    pub fn parse(input: &str) -> Result<Self, SourceError> {
        let mut pairs = Vec::new();
        for segment in input.split('&') {
            if segment.is_empty() {
                continue;
            }
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            pairs.push((decode_component(key)?, decode_component(value)?));
        }
        Ok(Self { pairs })
    }

    /// Build from already-decoded pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// The first value under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// All values under `key`, in insertion order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Append a decoded pair.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Whether the map holds no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn decode_component(component: &str) -> Result<String, SourceError> {
    let unplussed = component.replace('+', " ");
    urlencoding::decode(&unplussed)
        .map(std::borrow::Cow::into_owned)
        .map_err(|error| SourceError::malformed("percent encoding", error.to_string()))
}
