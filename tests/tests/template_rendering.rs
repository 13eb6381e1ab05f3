//! Rendering scenarios: spans resolved against a live page.

use arbor_tests::prelude::*;
use pretty_assertions::assert_eq;

/// A page with a navigation list whose items link to other pages.
struct Navigation {
    site: Site,
    items: Vec<NodeId>,
    targets: Vec<NodeId>,
}

fn navigation() -> Navigation {
    let mut site = Site::new("home").unwrap();
    let body = site.body;
    let (items, targets) = site
        .admin(|dom| {
            let page = dom.owner_document(body);
            let nav = dom.create_element(page, "nav")?;
            dom.append_child(body, nav)?;
            let mut items = Vec::new();
            let mut targets = Vec::new();
            for name in ["about", "blog"] {
                let target = dom.create_document(name)?;
                let item = dom.create_element(page, "a")?;
                dom.set_property(item, "label", Value::from(name))?;
                dom.set_property(
                    item,
                    "class",
                    Value::from("${active('current','plain')} ${capitalize(link.name)}"),
                )?;
                dom.set_link(item, target)?;
                dom.append_child(nav, item)?;
                items.push(item);
                targets.push(target);
            }
            Ok((items, targets))
        })
        .unwrap();
    Navigation {
        site,
        items,
        targets,
    }
}

#[test]
fn test_menu_marks_the_active_entry() {
    // GIVEN a request for the blog page
    let nav = navigation();
    let engine = TemplateEngine::new().unwrap();
    let blog = nav.targets[1];

    // WHEN each item renders with its target bound as the data record
    let rendered: Vec<String> = nav
        .items
        .iter()
        .zip(&nav.targets)
        .map(|(item, target)| {
            let ctx = RenderContext::new()
                .with_page(nav.site.page)
                .with_page_id(blog)
                .with_view_component(*target);
            engine
                .render_property(&nav.site.graph, *item, &ctx, "class")
                .unwrap()
                .unwrap_or_default()
        })
        .collect();

    // THEN only the blog item is current
    assert_eq!(rendered, vec!["plain About", "current Blog"]);
}

#[test]
fn test_request_parameters_and_page_properties() {
    let site = Site::new("home").unwrap();
    let request = RequestContext::new().with_parameter("name", "Ada");
    let ctx = RenderContext::new()
        .with_page(site.page)
        .with_request(&request);

    let rendered = site
        .render(
            site.body,
            &ctx,
            "Hi ${upper(request.name)}, welcome to ${page.name} (${md5(page.name)})",
        )
        .unwrap();

    assert_eq!(
        rendered,
        "Hi ADA, welcome to home (106a6c241b8797f52e1e77317b96a201)"
    );
}

#[test]
fn test_search_results_counted_per_request() {
    // GIVEN pages with indexed content
    let mut site = Site::new("search").unwrap();
    let search_page = site.page;
    run_in_transaction(&mut site.graph, |tx| {
        for (name, text) in [("guide", "Rust guide"), ("news", "Rust news"), ("misc", "Other")] {
            let page = tx.create_node(NodeKind::Document.type_id(), attrs! { props::NAME => name })?;
            let content = tx.create_node(CONTENT_TYPE, attrs! { props::CONTENT => text })?;
            tx.create_edge(RelType::Page.edge_type_id(), content, page, attrs!())?;
        }
        DomResult::Ok(())
    })
    .unwrap();

    // WHEN two requests search for different terms
    let rust = RequestContext::new().with_parameter("search", "rust");
    let other = RequestContext::new().with_parameter("search", "other");
    let empty = RequestContext::new();
    let render = |request: &RequestContext| {
        let ctx = RenderContext::new()
            .with_page(search_page)
            .with_request(request);
        site.render(site.body, &ctx, "${result_size} results").unwrap()
    };

    // THEN each request sees only its own results
    assert_eq!(render(&rust), "2 results");
    assert_eq!(render(&other), "1 results");
    assert_eq!(render(&empty), "0 results");
    assert_eq!(render(&rust), "2 results");
    assert!(rust.results().is_populated());
    assert!(!empty.results().is_populated());
}

#[test]
fn test_custom_search_parameter_and_functions() {
    let site = Site::new("home").unwrap();
    let mut engine =
        TemplateEngine::with_config(TemplateConfig::new().with_rest_response_attribute("payload"))
            .unwrap();
    engine
        .registry_mut()
        .register("repeat", |_: &FunctionContext, args: &[String]| -> Option<String> {
            let times = args.get(1)?.parse::<usize>().ok()?;
            Some(args.first()?.repeat(times))
        });
    let request = RequestContext::new().with_attribute("payload", "it's\n/ok");
    let ctx = RenderContext::new().with_request(&request);

    let rendered = engine
        .replace_variables(
            &site.graph,
            site.body,
            &ctx,
            "${repeat(ab,3)}|${rest_result}|${repeat(x)}",
        )
        .unwrap();

    assert_eq!(rendered, "ababab|it\\'s\\/ok|${repeat(x)}");
}

#[test]
fn test_nested_and_quoted_arguments() {
    let site = Site::new("home").unwrap();
    let ctx = RenderContext::new().with_page(site.page);

    let cases = [
        ("${if(equal(page.name,'home'),'Home, sweet','Away')}", "Home, sweet"),
        ("${if(equal(add(1,2),3),\"three\",other)}", "three"),
        ("${lower(if(equal(a,b),YES,NO))}", "no"),
        ("${add(1,add(2,3),x)}", "6"),
    ];
    for (raw, expected) in cases {
        assert_eq!(site.render(site.body, &ctx, raw).unwrap(), expected, "{}", raw);
    }
}
