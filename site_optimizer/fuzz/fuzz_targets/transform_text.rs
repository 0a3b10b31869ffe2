#![no_main]

use libfuzzer_sys::fuzz_target;
use site_optimizer::css_minifier::minify_css;
use site_optimizer::html::{extract_first_script, minify_html, splice_script};
use site_optimizer::js_minifier::minify_js;
use site_optimizer::obfuscator::Obfuscator;
use site_optimizer::protection::inject_protection;

fuzz_target!(|data: &[u8]| {
    let input = String::from_utf8_lossy(data);
    if input.len() > 100_000 {
        return;
    }

    assert!(minify_css(&input).len() <= input.len());
    assert!(minify_js(&input).len() <= input.len());
    assert!(minify_html(&input).len() <= input.len());

    if let Ok(out) = Obfuscator::default().obfuscate(&input) {
        let _ = minify_js(&out.code);
    }

    let html = inject_protection(&input);
    if let Some(script) = extract_first_script(&html) {
        let _ = splice_script(&html, &script, "");
    }
});
