//! script blocks injected into the composed document
//!
//! the instrumentation block runs before any project script. it forwards
//! console output and uncaught errors to the host through
//! `window.parent.postMessage`. a phone profile and a click inspector are
//! added on request

use super::PreviewOptions;
use crate::constants::{
    HIGHLIGHT_DELAY_MS, HIGHLIGHT_OUTLINE, MOBILE_PLATFORM, MOBILE_TOUCH_POINTS,
    MOBILE_USER_AGENT, TELEMETRY_SOURCE,
};

const TELEMETRY_JS: &str = r#"
  var SOURCE = __SOURCE__;
  function describe(arg) {
    if (arg instanceof Error) {
      return arg.name + ": " + arg.message;
    }
    if (typeof arg === "object" && arg !== null) {
      try {
        var json = JSON.stringify(arg);
        if (json !== undefined) { return json; }
      } catch (e) {}
      try { return Object.prototype.toString.call(arg); } catch (e) { return "[object]"; }
    }
    try { return String(arg); } catch (e) { return "[" + typeof arg + "]"; }
  }
  function send(type, args) {
    try {
      var message = Array.prototype.map.call(args, describe).join(" ");
      window.parent.postMessage({ source: SOURCE, type: type, message: message }, "*");
    } catch (e) {}
  }
  ["log", "error", "warn", "info"].forEach(function (type) {
    var original = console[type];
    console[type] = function () {
      if (original) { original.apply(console, arguments); }
      send(type, arguments);
    };
  });
  window.addEventListener("error", function (event) {
    send("error", [event.message || "Script error"]);
  });
  window.addEventListener("unhandledrejection", function (event) {
    send("error", ["Unhandled rejection:", event.reason]);
  });
"#;

const MOBILE_JS: &str = r#"
  try {
    Object.defineProperty(navigator, "userAgent", { get: function () { return __USER_AGENT__; } });
    Object.defineProperty(navigator, "platform", { get: function () { return __PLATFORM__; } });
    Object.defineProperty(navigator, "maxTouchPoints", { get: function () { return __TOUCH_POINTS__; } });
    if (!("ontouchstart" in window)) { window.ontouchstart = null; }
  } catch (e) {}
"#;

const INSPECTOR_JS: &str = r##"
  document.addEventListener("click", function (event) {
    var el = event.target;
    if (!el || !el.tagName) { return; }
    var info = el.tagName.toLowerCase();
    if (el.id) { info += "#" + el.id; }
    var cls = typeof el.className === "string" ? el.className.trim().split(/\s+/)[0] : "";
    if (cls) { info += "." + cls; }
    send("info", ["Element clicked:", info]);
    var previous = el.style.outline;
    el.style.outline = __OUTLINE__;
    setTimeout(function () { el.style.outline = previous; }, __DELAY__);
  }, true);
"##;

/// the instrumentation `<script>` block for one assembly
pub fn instrumentation(options: PreviewOptions) -> String {
    let mut body = String::new();

    // mobile overrides go first so project code never sees the real profile
    if options.mobile_emulation {
        body.push_str(
            &MOBILE_JS
                .replace("__USER_AGENT__", &js_string(MOBILE_USER_AGENT))
                .replace("__PLATFORM__", &js_string(MOBILE_PLATFORM))
                .replace("__TOUCH_POINTS__", &MOBILE_TOUCH_POINTS.to_string()),
        );
    }

    body.push_str(&TELEMETRY_JS.replace("__SOURCE__", &js_string(TELEMETRY_SOURCE)));

    if options.debug_mode {
        body.push_str(
            &INSPECTOR_JS
                .replace("__OUTLINE__", &js_string(HIGHLIGHT_OUTLINE))
                .replace("__DELAY__", &HIGHLIGHT_DELAY_MS.to_string()),
        );
    }

    format!("<script>\n(function () {{{body}}})();\n</script>\n")
}

/// wrap one project script so a throw is reported and later scripts still run
pub fn wrap_script(name: &str, content: &str) -> String {
    let label = js_string(&format!("Script Error in {name}:"));
    format!(
        "<script>\ntry {{\n{}\n}} catch (e) {{\n  console.error({label}, e);\n}}\n</script>\n",
        escape_close_tag(content, "script")
    )
}

/// encode `value` as a javascript string literal safe to embed in a script block
pub fn js_string(value: &str) -> String {
    let literal = serde_json::to_string(value).unwrap_or_else(|_| String::from("\"\""));
    literal.replace("</", "<\\/")
}

/// stop a literal `</tag` inside embedded text from closing the block early
pub fn escape_close_tag(content: &str, tag: &str) -> String {
    let needle = format!("</{}", tag.to_ascii_lowercase());
    let lower = content.to_ascii_lowercase();
    if !lower.contains(&needle) {
        return content.to_string();
    }
    let mut out = String::with_capacity(content.len() + 8);
    let mut last = 0;
    for (idx, _) in lower.match_indices(&needle) {
        out.push_str(&content[last..idx]);
        out.push_str("<\\/");
        last = idx + 2;
    }
    out.push_str(&content[last..]);
    out
}
