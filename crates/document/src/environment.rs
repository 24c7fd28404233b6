/// Property names exposed on the global object of this document environment.
///
/// Event handler slots follow the `on<kind>` convention and sit next to
/// ordinary properties, mirroring what a browser window exposes.
const GLOBAL_PROPERTIES: &[&str] = &[
    "window",
    "self",
    "document",
    "name",
    "location",
    "history",
    "navigator",
    "console",
    "performance",
    "localStorage",
    "sessionStorage",
    "innerWidth",
    "innerHeight",
    "scrollX",
    "scrollY",
    "devicePixelRatio",
    "onabort",
    "onanimationend",
    "onanimationiteration",
    "onanimationstart",
    "onbeforeinput",
    "onblur",
    "onchange",
    "onclick",
    "oncontextmenu",
    "oncopy",
    "oncut",
    "ondblclick",
    "ondrag",
    "ondragend",
    "ondragenter",
    "ondragleave",
    "ondragover",
    "ondragstart",
    "ondrop",
    "onerror",
    "onfocus",
    "onfocusin",
    "onfocusout",
    "oninput",
    "oninvalid",
    "onkeydown",
    "onkeypress",
    "onkeyup",
    "onload",
    "onmousedown",
    "onmouseenter",
    "onmouseleave",
    "onmousemove",
    "onmouseout",
    "onmouseover",
    "onmouseup",
    "onpaste",
    "onpointercancel",
    "onpointerdown",
    "onpointerenter",
    "onpointerleave",
    "onpointermove",
    "onpointerout",
    "onpointerover",
    "onpointerup",
    "onreset",
    "onresize",
    "onscroll",
    "onselect",
    "onsubmit",
    "ontoggle",
    "ontouchcancel",
    "ontouchend",
    "ontouchmove",
    "ontouchstart",
    "ontransitioncancel",
    "ontransitionend",
    "ontransitionrun",
    "ontransitionstart",
    "onwheel",
    "customElements",
    "crypto",
];

pub fn global_properties() -> &'static [&'static str] {
    GLOBAL_PROPERTIES
}
