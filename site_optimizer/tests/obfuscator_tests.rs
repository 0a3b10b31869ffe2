use site_optimizer::js_minifier::minify_js;
use site_optimizer::obfuscator::{Obfuscator, ProtectedNames};

const SLIDESHOW: &str = r#"
let currentSlideIndex = 0;
const slides = document.querySelectorAll('.slide');
const totalSlides = slides.length;

function showSlide(index) {
    slides.forEach(function (slide) { slide.classList.remove('active'); });
    slides[index].classList.add('active');
}

function nextSlide() {
    currentSlideIndex = (currentSlideIndex + 1) % totalSlides;
    showSlide(currentSlideIndex);
}
"#;

#[test]
fn every_occurrence_gets_the_same_name() {
    let src = "let x = 1;\nx = x + 1;\nconsole.log(x);\nif (x > 2) { x = 0; }";
    let out = Obfuscator::default().obfuscate(src).unwrap();
    let name = out.identifiers.get("x").unwrap().to_string();
    assert_eq!(out.code.matches(name.as_str()).count(), 6);
    assert!(!out.code.contains(" x"));
    assert!(!ProtectedNames::default().contains(&name));
}

#[test]
fn protected_names_survive() {
    let out = Obfuscator::default().obfuscate(SLIDESHOW).unwrap();
    assert!(out.code.contains("let currentSlideIndex = 0;"));
    assert!(out.code.contains("const totalSlides = _c.length;"));
    assert!(out.identifiers.get("currentSlideIndex").is_none());
    assert!(out.identifiers.get("totalSlides").is_none());
}

#[test]
fn functions_and_calls_are_renamed() {
    let out = Obfuscator::default().obfuscate(SLIDESHOW).unwrap();
    let show = out.identifiers.get("showSlide").unwrap();
    let next = out.identifiers.get("nextSlide").unwrap();
    assert_ne!(show, next);
    assert!(out.code.contains(&format!("function {}(index)", show)));
    assert!(out.code.contains(&format!("{}(currentSlideIndex);", show)));
    assert!(!out.code.contains("showSlide"));
}

#[test]
fn distinct_identifiers_never_share_a_name() {
    let src = "var a = 1; var b = 2; let c = a + b; function d() { return c; }";
    let out = Obfuscator::default().obfuscate(src).unwrap();
    let mut names: Vec<&str> = out.identifiers.iter().map(|(_, r)| r).collect();
    let total = names.len();
    names.sort();
    names.dedup();
    assert_eq!(total, 4);
    assert_eq!(names.len(), 4);
}

#[test]
fn same_name_in_different_scopes_collapses() {
    let src = "function f() { let i = 1; return i; }\nfunction g() { let i = 2; return i; }";
    let out = Obfuscator::default().obfuscate(src).unwrap();
    let i = out.identifiers.get("i").unwrap();
    assert_eq!(out.code.matches(&format!("let {} =", i)).count(), 2);
    assert_eq!(out.identifiers.len(), 3);
}

#[test]
fn custom_protected_set_is_honoured() {
    let obfuscator = Obfuscator::new(ProtectedNames::new(["keepMe"]));
    let out = obfuscator
        .obfuscate("function keepMe() {} let other = keepMe();")
        .unwrap();
    assert!(out.code.contains("function keepMe()"));
    assert!(out.identifiers.get("keepMe").is_none());
    assert_eq!(out.identifiers.get("other"), Some("_a"));
}

#[test]
fn passes_are_independent() {
    let obfuscator = Obfuscator::default();
    let first = obfuscator.obfuscate("let alpha = 1;").unwrap();
    let second = obfuscator.obfuscate("let beta = 1;").unwrap();
    assert_eq!(first.identifiers.get("alpha"), Some("_a"));
    assert_eq!(second.identifiers.get("beta"), Some("_a"));
}

#[test]
fn obfuscate_then_minify() {
    let out = Obfuscator::default().obfuscate(SLIDESHOW).unwrap();
    let js = minify_js(&out.code);
    assert!(!js.contains('\n'));
    assert!(js.starts_with("let currentSlideIndex = 0;"));
}

#[test]
fn replacement_is_not_renamed_again() {
    let out = Obfuscator::default()
        .obfuscate("let x = 1; let _a = 2; console.log(x, _a);")
        .unwrap();
    let x = out.identifiers.get("x").unwrap();
    let a = out.identifiers.get("_a").unwrap();
    assert_ne!(x, a);
    assert_eq!(
        out.code,
        format!("let {x} = 1; let {a} = 2; console.log({x}, {a});")
    );
}

#[test]
fn synthesized_names_avoid_existing_tokens() {
    let out = Obfuscator::default()
        .obfuscate("let count = _a + 1; console.log(count, _a);")
        .unwrap();
    assert_eq!(out.identifiers.get("count"), Some("_b"));
    assert_eq!(out.code, "let _b = _a + 1; console.log(_b, _a);");
}
