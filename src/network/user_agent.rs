//! User agent strings

use rand::seq::SliceRandom;
use rand::Rng;

/// User agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/60.0.3112.113 Safari/537.36";

const CHROME_VERSIONS: [&str; 6] = [
    "120.0.0.0",
    "121.0.0.0",
    "122.0.0.0",
    "123.0.0.0",
    "124.0.0.0",
    "125.0.0.0",
];

const FIREFOX_VERSIONS: [&str; 5] = ["121.0", "122.0", "123.0", "124.0", "125.0"];

const SAFARI_VERSIONS: [&str; 3] = ["17.2", "17.3", "17.4"];

const OS_STRINGS: [&str; 5] = [
    "Windows NT 10.0; Win64; x64",
    "Windows NT 11.0; Win64; x64",
    "Macintosh; Intel Mac OS X 10_15_7",
    "X11; Linux x86_64",
    "X11; Ubuntu; Linux x86_64",
];

/// Generate a random but realistic desktop browser user agent
pub fn generate_user_agent() -> String {
    let mut rng = rand::thread_rng();
    let os = OS_STRINGS.choose(&mut rng).copied().unwrap_or(OS_STRINGS[0]);

    match rng.gen_range(0..10u8) {
        // Chrome 60%, Firefox 30%, Safari 10%
        0..=5 => {
            let chrome = CHROME_VERSIONS.choose(&mut rng).copied().unwrap_or(CHROME_VERSIONS[0]);
            format!(
                "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
                os, chrome
            )
        }
        6..=8 => {
            let firefox = FIREFOX_VERSIONS.choose(&mut rng).copied().unwrap_or(FIREFOX_VERSIONS[0]);
            format!(
                "Mozilla/5.0 ({}; rv:{}) Gecko/20100101 Firefox/{}",
                os, firefox, firefox
            )
        }
        _ => {
            let safari = SAFARI_VERSIONS.choose(&mut rng).copied().unwrap_or(SAFARI_VERSIONS[0]);
            format!(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_2_1) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/{} Safari/605.1.15",
                safari
            )
        }
    }
}
