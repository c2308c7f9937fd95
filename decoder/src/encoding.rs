//! Подбор кодировки для сырых байтов выписки.

use encoding_rs::{Encoding, UTF_8};
use tracing::{debug, warn};

/// Кандидаты по умолчанию, в порядке вероятности для выгрузок турецких банков
pub const DEFAULT_ENCODINGS: [&str; 4] = ["utf-8", "iso-8859-9", "windows-1254", "iso-8859-1"];

/// Маркеры, по наличию которых текст считается похожим на MT940
const MARKERS: [&str; 2] = [":20:", ":25:"];

/// Декодированный текст и кодировка, которой он получен
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    /// метка кандидата, на котором сработала проверка, либо "utf-8" для запасного варианта
    pub encoding: String,
    /// `true`, если ни один кандидат не подошёл и текст получен с заменой битых символов
    pub lossy: bool,
}

fn looks_like_mt940(text: &str) -> bool {
    MARKERS.iter().any(|m| text.contains(m))
}

/// Пробует декодировать байты без замены символов. `None`, если байты невалидны для кодировки.
fn try_decode(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.trim_start_matches('\u{feff}').to_string())
}

/// [`resolve_with`] со списком [`DEFAULT_ENCODINGS`]
pub fn resolve(bytes: &[u8]) -> DecodedText {
    resolve_with(bytes, &DEFAULT_ENCODINGS)
}

/// Перебирает кандидатов по порядку и берёт первого, чей текст содержит `:20:` или `:25:`.
///
/// Никогда не падает: если ничего не подошло, байты декодируются как UTF-8 с заменой
/// невалидных последовательностей на U+FFFD.
pub fn resolve_with(bytes: &[u8], labels: &[&str]) -> DecodedText {
    for &label in labels {
        let Some(encoding) = Encoding::for_label(label.as_bytes()) else {
            warn!(label, "unknown encoding label, skipping");
            continue;
        };

        match try_decode(encoding, bytes) {
            Some(text) if looks_like_mt940(&text) => {
                debug!(label, resolved = encoding.name(), "encoding accepted");
                return DecodedText {
                    text,
                    encoding: label.to_string(),
                    lossy: false,
                };
            }
            Some(_) => debug!(label, "decoded, but no MT940 markers found"),
            None => debug!(label, "bytes are not valid in this encoding"),
        }
    }

    debug!("no candidate matched, falling back to lossy utf-8");
    let (text, _had_errors) = UTF_8.decode_with_bom_removal(bytes);
    DecodedText {
        text: text.into_owned(),
        encoding: "utf-8".to_string(),
        lossy: true,
    }
}
