//! Display masking for secrets.

const MASK: char = '*';
const VISIBLE: usize = 4;

/// Masks a secret for display, keeping the first and last four characters.
///
/// Secrets of eight characters or fewer would be revealed entirely by that rule, so
/// they are masked completely. The result always has as many characters as the input.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let len = chars.len();
    if len <= VISIBLE * 2 {
        return MASK.to_string().repeat(len);
    }

    let mut masked = String::with_capacity(secret.len());
    masked.extend(&chars[..VISIBLE]);
    masked.extend(std::iter::repeat_n(MASK, len - VISIBLE * 2));
    masked.extend(&chars[len - VISIBLE..]);
    masked
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn masks_interior_of_long_secrets() {
        assert_eq!(mask_secret("AC1234567890abcdef"), "AC12**********cdef");
        assert_eq!(mask_secret("123456789"), "1234*6789");
    }

    #[test]
    fn short_secrets_are_fully_masked() {
        assert_eq!(mask_secret(""), "");
        assert_eq!(mask_secret("abc"), "***");
        assert_eq!(mask_secret("12345678"), "********");
    }

    proptest! {
        #[test]
        fn masked_length_matches_input(secret in "\\PC{0,64}") {
            prop_assert_eq!(mask_secret(&secret).chars().count(), secret.chars().count());
        }

        #[test]
        fn long_secrets_keep_both_ends(secret in "[A-Za-z0-9]{9,64}") {
            let masked = mask_secret(&secret);
            prop_assert_eq!(&masked[..4], &secret[..4]);
            prop_assert_eq!(&masked[masked.len() - 4..], &secret[secret.len() - 4..]);
            prop_assert!(masked[4..masked.len() - 4].chars().all(|c| c == '*'));
        }

        #[test]
        fn short_secrets_reveal_nothing(secret in "[A-Za-z0-9]{1,8}") {
            prop_assert!(mask_secret(&secret).chars().all(|c| c == '*'));
        }
    }
}
