//! Request-scoped model of the device handoff.
//!
//! An identity provider calls back with `code` and `state`. The `state` value
//! carries a percent-encoded, form-serialized [`DeviceTarget`] naming the
//! local-network device that should receive the code. Nothing here validates
//! the target: the device address and path are trusted as given.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use url::form_urlencoded;

use crate::errors::StateError;

/// Characters escaped by [`encode_uri_component`]: all but ASCII alphanumerics and `-_.!~*'()`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// State key naming the device host.
pub const DEVICE_IP_KEY: &str = "device_ip";

/// State key naming the callback path on the device.
pub const CALLBACK_PATH_KEY: &str = "callback_path";

/// The `code` and `state` query parameters of a provider callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: String,
    pub state: String,
}

impl CallbackParams {
    /// Extract `code` and `state` from a raw query string.
    ///
    /// The first occurrence of each key wins. Returns `None` when either
    /// value is missing or empty. See [`decode_query_component`] for how
    /// each key and value is decoded.
    pub fn from_query(query: Option<&str>) -> Option<Self> {
        let query = query?;

        let mut code = None;
        let mut state = None;
        for (key, value) in query_pairs(query) {
            match key.as_str() {
                "code" if code.is_none() => code = Some(value),
                "state" if state.is_none() => state = Some(value),
                _ => {}
            }
        }

        match (code, state) {
            (Some(code), Some(state)) if !code.is_empty() && !state.is_empty() => {
                Some(Self { code, state })
            }
            _ => None,
        }
    }
}

/// Split a raw query string into decoded pairs.
///
/// A segment without `=` is a key with an empty value. Empty segments are skipped.
fn query_pairs(query: &str) -> impl Iterator<Item = (String, String)> + '_ {
    query
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            (decode_query_component(key), decode_query_component(value))
        })
}

/// Decode one query key or value: `+` becomes a space, then strict percent-decoding.
///
/// When the escapes are malformed or not UTF-8 the text is kept as is
/// (with `+` already replaced), so a bad `state` reaches
/// [`StateParams::decode`] untouched and a bad `code` is forwarded intact.
pub fn decode_query_component(input: &str) -> String {
    let spaced = input.replace('+', " ");
    decode_uri_component(&spaced).unwrap_or(spaced)
}

/// Key/value pairs decoded from a `state` value, in their original order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateParams(Vec<(String, String)>);

impl StateParams {
    /// Percent-decode `state` and parse the result as form pairs.
    ///
    /// Only the percent-decoding step can fail. Text that does not look like
    /// form pairs still parses, it just won't contain the keys callers need.
    pub fn decode(state: &str) -> Result<Self, StateError> {
        let decoded = decode_uri_component(state)?;
        Ok(Self(
            form_urlencoded::parse(decoded.as_bytes())
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect(),
        ))
    }

    /// Value of the first pair named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value.as_str())
    }
}

/// Where on the local network the authorization code should be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceTarget {
    pub device_ip: String,
    pub callback_path: String,
}

impl DeviceTarget {
    /// Read the target out of decoded state, `None` if either key is missing or empty.
    pub fn from_state(params: &StateParams) -> Option<Self> {
        let device_ip = params.get(DEVICE_IP_KEY).filter(|value| !value.is_empty())?;
        let callback_path = params
            .get(CALLBACK_PATH_KEY)
            .filter(|value| !value.is_empty())?;

        Some(Self {
            device_ip: device_ip.to_string(),
            callback_path: callback_path.to_string(),
        })
    }

    /// `http://{device_ip}{callback_path}?code={code}` with only the code encoded.
    pub fn redirect_url(&self, code: &str) -> String {
        format!(
            "http://{}{}?code={}",
            self.device_ip,
            self.callback_path,
            encode_uri_component(code)
        )
    }

    /// Build the `state` value a device sends to the identity provider.
    ///
    /// `StateParams::decode` applied to the value the provider echoes back
    /// yields this target again.
    pub fn to_state(&self) -> String {
        let serialized = form_urlencoded::Serializer::new(String::new())
            .append_pair(DEVICE_IP_KEY, &self.device_ip)
            .append_pair(CALLBACK_PATH_KEY, &self.callback_path)
            .finish();
        encode_uri_component(&serialized)
    }
}

/// Percent-encode everything except ASCII alphanumerics and `-_.!~*'()`.
pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

/// Strict percent-decoding.
///
/// Every `%` must start a two hex digit escape and the decoded bytes must be
/// UTF-8. `+` is not treated as a space.
pub fn decode_uri_component(input: &str) -> Result<String, StateError> {
    let bytes = input.as_bytes();
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'%' {
            match bytes.get(index + 1..index + 3) {
                Some([high, low]) if high.is_ascii_hexdigit() && low.is_ascii_hexdigit() => {
                    index += 3;
                }
                _ => return Err(StateError::MalformedEscape(index)),
            }
        } else {
            index += 1;
        }
    }

    percent_decode_str(input)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|err| StateError::InvalidUtf8(err.to_string()))
}
