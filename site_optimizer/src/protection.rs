//! Anti-inspection script injected into the page head.

pub const HEAD_CLOSE: &str = "</head>";

/// Window chrome larger than this (px) is taken to mean docked devtools.
pub const DEVTOOLS_THRESHOLD_PX: u32 = 200;
pub const CONSOLE_CLEAR_INTERVAL_MS: u32 = 1000;
pub const DEVTOOLS_POLL_INTERVAL_MS: u32 = 500;

/// Key codes swallowed by the keydown handler: F12, I, U, S, C.
pub const BLOCKED_KEY_CODES: [u32; 5] = [123, 73, 85, 83, 67];

pub const DEVTOOLS_WARNING: &str = "Developer tools detected. Please close them to continue.";

/// Protections the injected script applies, in report order.
pub const APPLIED_PROTECTIONS: [&str; 6] = [
    "Right-click disabled",
    "Developer tools detection",
    "Keyboard shortcuts blocked",
    "Text selection disabled",
    "Console clearing",
    "Code obfuscation",
];

pub fn protection_script() -> String {
    format!(
        r#"<script>
(function () {{
  var block = function (e) {{ e.preventDefault(); return false; }};
  document.addEventListener('contextmenu', block);
  document.addEventListener('selectstart', block);
  document.addEventListener('dragstart', block);
  document.addEventListener('keydown', function (e) {{
    var k = e.keyCode;
    if (k === 123) return block(e);
    if (e.ctrlKey && e.shiftKey && (k === 73 || k === 67)) return block(e);
    if (e.ctrlKey && (k === 85 || k === 83)) return block(e);
  }});
  setInterval(function () {{ console.clear(); }}, {clear_ms});
  var devtoolsOpen = false;
  setInterval(function () {{
    var open = window.outerHeight - window.innerHeight > {threshold} ||
      window.outerWidth - window.innerWidth > {threshold};
    if (open && !devtoolsOpen) {{
      devtoolsOpen = true;
      console.clear();
      document.body.innerHTML = '<h1 style="text-align:center;margin-top:200px;">{warning}</h1>';
    }} else if (!open && devtoolsOpen) {{
      devtoolsOpen = false;
      location.reload();
    }}
  }}, {poll_ms});
}})();
</script>"#,
        clear_ms = CONSOLE_CLEAR_INTERVAL_MS,
        threshold = DEVTOOLS_THRESHOLD_PX,
        warning = DEVTOOLS_WARNING,
        poll_ms = DEVTOOLS_POLL_INTERVAL_MS,
    )
}

/// Inserts the protection script right before the first `</head>`. A
/// document without one comes back unchanged.
pub fn inject_protection(html: &str) -> String {
    match html.find(HEAD_CLOSE) {
        Some(at) => {
            let script = protection_script();
            let mut out = String::with_capacity(html.len() + script.len() + 1);
            out.push_str(&html[..at]);
            out.push_str(&script);
            out.push('\n');
            out.push_str(&html[at..]);
            out
        }
        None => html.to_string(),
    }
}
