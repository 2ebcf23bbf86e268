use std::fs;
use std::path::Path;

use reply_render::minijinja::{context, Value};
use reply_render::{FuncMap, RenderError, RenderInput, TemplateLoader, Templates};
use tempfile::TempDir;

fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn load(dir: &Path) -> Templates {
    TemplateLoader::new(dir).load().unwrap()
}

fn input(data: Value) -> RenderInput {
    RenderInput::new(Value::from("ctx"), data)
}

#[test]
fn every_file_base_name_is_a_template() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "index.html", "index");
    write(tmp.path(), "partials/header.tmpl", "header");
    write(tmp.path(), "deep/er/still/footer", "footer");
    write(tmp.path(), "notes.txt", "notes");

    let templates = load(tmp.path());
    assert_eq!(
        templates.names().unwrap(),
        vec!["footer", "header.tmpl", "index.html", "notes.txt"]
    );
    for name in ["footer", "header.tmpl", "index.html", "notes.txt"] {
        assert!(templates.contains(name), "{name} should be loaded");
    }
}

#[test]
fn missing_directory_is_absent_not_an_error() {
    let tmp = TempDir::new().unwrap();
    let templates = TemplateLoader::new(tmp.path().join("views")).load().unwrap();

    assert!(!templates.is_loaded());
    assert!(templates
        .render("index.html", input(Value::UNDEFINED))
        .unwrap_err()
        .is_no_template_directory());
    assert!(templates.get("index.html").unwrap_err().is_no_template_directory());
}

#[test]
fn colliding_base_names_keep_last_in_traversal_order() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "a/page.html", "from a");
    write(tmp.path(), "b/page.html", "from b");

    for _ in 0..3 {
        let out = load(tmp.path())
            .render("page.html", input(Value::UNDEFINED))
            .unwrap();
        assert_eq!(out, "from b");
    }
}

#[test]
fn parse_failure_aborts_the_whole_load() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "good.html", "fine");
    write(tmp.path(), "bad.html", "{% if %}");

    let err = TemplateLoader::new(tmp.path()).load().unwrap_err();
    match err {
        RenderError::Parse { name, path, .. } => {
            assert_eq!(name, "bad.html");
            assert!(path.ends_with("bad.html"));
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn unreadable_file_aborts_the_whole_load() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "good.html", "fine");
    fs::write(tmp.path().join("latin1.html"), b"\xff\xfe").unwrap();

    let err = TemplateLoader::new(tmp.path()).load().unwrap_err();
    match err {
        RenderError::Walk { path, source } => {
            assert!(path.ends_with("latin1.html"));
            assert_eq!(source.kind(), std::io::ErrorKind::InvalidData);
        }
        other => panic!("expected walk error, got {other:?}"),
    }
}

#[test]
fn urls_render_unescaped_but_markup_is_escaped() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "link.html", r#"<a href="{{ href }}">{{ label }}</a>"#);

    let out = load(tmp.path())
        .render(
            "link.html",
            input(context! { href => "/cars/7?a=1&b=2", label => "<new>" }),
        )
        .unwrap();
    assert_eq!(out, r#"<a href="/cars/7?a=1&amp;b=2">&lt;new&gt;</a>"#);
}

#[test]
fn caller_html_overrides_builtin() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "page.html", "{{ html(v) }}");

    let builtin = load(tmp.path())
        .render("page.html", input(context! { v => "<b>" }))
        .unwrap();
    assert_eq!(builtin, "<b>");

    let mut loader = TemplateLoader::new(tmp.path());
    loader
        .register_functions(FuncMap::new().add("html", |s: String| format!("override:{s}")))
        .unwrap();
    let out = loader
        .load()
        .unwrap()
        .render("page.html", input(context! { v => "<b>" }))
        .unwrap();
    assert_eq!(out, "override:&lt;b&gt;");
}

#[test]
fn nl2br_inserts_line_breaks() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "page.html", "{{ nl2br(v) }}");

    let out = load(tmp.path())
        .render("page.html", input(context! { v => "a\nb" }))
        .unwrap();
    assert_eq!(out, "a<br>b");
    assert!(!out.contains('\n'));
}

#[test]
fn unregistered_function_fails_at_render_time() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "page.html", "{{ to_upper(v) }}");

    let templates = load(tmp.path());
    let err = templates
        .render("page.html", input(context! { v => "x" }))
        .unwrap_err();
    assert!(matches!(err, RenderError::Render(_)));
}

#[test]
fn templates_include_each_other_by_base_name() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "layout/base.html", "<h1>{% include 'title.html' %}</h1>");
    write(tmp.path(), "parts/title.html", "{{ title }}");

    let out = load(tmp.path())
        .render("base.html", input(context! { title => "Home" }))
        .unwrap();
    assert_eq!(out, "<h1>Home</h1>");
}

#[test]
fn context_key_is_not_controlled_by_caller_data() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "page.html", "{{ c }}");

    let out = load(tmp.path())
        .render("page.html", input(context! { c => "forged" }))
        .unwrap();
    assert_eq!(out, "ctx");
}

#[test]
fn templates_are_shared_across_threads() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "n.html", "{{ n }}");
    let templates = load(tmp.path());

    let handles: Vec<_> = (0..4)
        .map(|n| {
            let templates = templates.clone();
            std::thread::spawn(move || {
                templates
                    .render("n.html", input(context! { n => n }))
                    .unwrap()
            })
        })
        .collect();
    let outputs: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(outputs, vec!["0", "1", "2", "3"]);
}
