//! Editing scenarios against a small page.

use arbor_tests::prelude::*;

mod structure {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_page_from_markup_order() {
        // GIVEN an empty body
        let mut site = Site::new("home").unwrap();
        let body = site.body;

        // WHEN an importer appends nodes in document order
        site.admin(|dom| {
            let page = dom.owner_document(body);
            let h1 = dom.create_element(page, "h1")?;
            let title = dom.create_text_node(page, "Welcome")?;
            let p = dom.create_element(page, "p")?;
            let intro = dom.create_text_node(page, "Hello ")?;
            let world = dom.create_text_node(page, "world")?;
            dom.append_child(body, h1)?;
            dom.append_child(h1, title)?;
            dom.append_child(body, p)?;
            dom.append_child(p, intro)?;
            dom.append_child(p, world)?;
            Ok(())
        })
        .unwrap();

        // THEN the tree mirrors the markup
        TreeAssertion::new()
            .children(["<h1>", "<p>"])
            .text("WelcomeHello world")
            .parent(site.html)
            .attached()
            .check(site.view(), body)
            .unwrap();
        let p = site.view().child_nodes(body)[1];
        assert_eq!(site.labels(p), vec!["Hello ", "world"]);
    }

    #[test]
    fn test_move_between_parents() {
        let mut site = Site::new("home").unwrap();
        let body = site.body;
        let (left, right, item) = site
            .admin(|dom| {
                let page = dom.owner_document(body);
                let left = dom.create_element(page, "ul")?;
                let right = dom.create_element(page, "ol")?;
                let item = dom.create_element(page, "li")?;
                dom.append_child(body, left)?;
                dom.append_child(body, right)?;
                dom.append_child(left, item)?;
                Ok((left, right, item))
            })
            .unwrap();

        site.admin(|dom| dom.append_child(right, item)).unwrap();

        TreeAssertion::new().child_ids(&[]).check(site.view(), left).unwrap();
        TreeAssertion::new()
            .child_ids(&[item])
            .check(site.view(), right)
            .unwrap();
        TreeAssertion::new().parent(right).check(site.view(), item).unwrap();
    }

    #[test]
    fn test_remove_and_reattach_cycles_attachment() {
        let mut site = Site::new("home").unwrap();
        let body = site.body;
        let div = site
            .admin(|dom| {
                let page = dom.owner_document(body);
                let div = dom.create_element(page, "div")?;
                dom.append_child(body, div)
            })
            .unwrap();

        for _ in 0..3 {
            site.admin(|dom| dom.remove_child(body, div)).unwrap();
            TreeAssertion::new()
                .orphan()
                .detached()
                .check(site.view(), div)
                .unwrap();

            site.admin(|dom| dom.append_child(body, div)).unwrap();
            TreeAssertion::new()
                .parent(body)
                .attached()
                .check(site.view(), div)
                .unwrap();
        }
    }

    #[test]
    fn test_fragment_bulk_insert() {
        // GIVEN a list with one item and a fragment of three new items
        let mut site = Site::new("home").unwrap();
        let body = site.body;
        let (list, fragment) = site
            .admin(|dom| {
                let page = dom.owner_document(body);
                let list = dom.create_element(page, "ul")?;
                dom.append_child(body, list)?;
                let last = dom.create_text_node(page, "last")?;
                dom.append_child(list, last)?;
                let fragment = dom.create_fragment(None)?;
                for label in ["one", "two", "three"] {
                    let text = dom.create_text_node(None, label)?;
                    dom.append_child(fragment, text)?;
                }
                Ok((list, fragment))
            })
            .unwrap();

        // WHEN inserting the fragment before the existing item
        site.admin(|dom| {
            let first = dom.first_child(list);
            dom.insert_before(list, fragment, first)
        })
        .unwrap();

        // THEN the items land in order and are adopted into the page
        TreeAssertion::new()
            .children(["one", "two", "three", "last"])
            .check(site.view(), list)
            .unwrap();
        TreeAssertion::new().child_ids(&[]).check(site.view(), fragment).unwrap();
        for child in site.view().child_nodes(list) {
            assert_eq!(site.view().owner_document(child), Some(site.page));
        }
    }
}

mod validation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_failed_edit_rolls_back_whole_transaction() {
        // GIVEN a body with one paragraph
        let mut site = Site::new("home").unwrap();
        let body = site.body;
        let html = site.html;
        let p = site
            .admin(|dom| {
                let page = dom.owner_document(body);
                let p = dom.create_element(page, "p")?;
                dom.append_child(body, p)
            })
            .unwrap();

        // WHEN an edit appends a node and then attempts an illegal move
        let err = site
            .admin(|dom| {
                let page = dom.owner_document(body);
                let extra = dom.create_element(page, "span")?;
                dom.append_child(body, extra)?;
                dom.append_child(p, html)
            })
            .unwrap_err();

        // THEN nothing from the edit survives
        assert!(matches!(err, DomError::HierarchyRequestAncestor(_)));
        TreeAssertion::new()
            .child_ids(&[p])
            .check(site.view(), body)
            .unwrap();
    }

    #[test]
    fn test_document_accepts_single_html_root() {
        let mut site = Site::new("home").unwrap();
        let page = site.page;

        let err = site
            .admin(|dom| {
                let second = dom.create_element(Some(page), "html")?;
                dom.append_child(page, second)
            })
            .unwrap_err();
        assert!(matches!(err, DomError::HierarchyRequestWrongRoot(_)));

        let err = site
            .admin(|dom| {
                let body = dom.create_element(Some(page), "body")?;
                let html = dom.first_child(page).unwrap_or(body);
                dom.replace_child(page, body, html)
            })
            .unwrap_err();
        assert!(matches!(err, DomError::HierarchyRequestWrongRoot(_)));
        TreeAssertion::new()
            .children(["<html>"])
            .check(site.view(), page)
            .unwrap();
    }

    #[test]
    fn test_cross_document_insert_requires_adopt() {
        let mut site = Site::new("home").unwrap();
        let body = site.body;
        let (other, foreign) = site
            .admin(|dom| {
                let other = dom.create_document("other")?;
                let foreign = dom.create_element(Some(other), "aside")?;
                Ok((other, foreign))
            })
            .unwrap();

        let err = site.admin(|dom| dom.append_child(body, foreign)).unwrap_err();
        assert!(matches!(err, DomError::WrongDocument(_)));

        let page = site.page;
        site.admin(|dom| {
            dom.adopt(foreign, page)?;
            dom.append_child(body, foreign)
        })
        .unwrap();
        assert_eq!(site.view().owner_document(foreign), Some(page));
        assert_ne!(site.view().owner_document(foreign), Some(other));
    }

    #[test]
    fn test_wrapped_foreign_node_is_rejected() {
        // GIVEN an aside owned by another document
        let mut site = Site::new("home").unwrap();
        let body = site.body;
        let foreign = site
            .admin(|dom| {
                let other = dom.create_document("other")?;
                dom.create_element(Some(other), "aside")
            })
            .unwrap();

        // WHEN it is wrapped in an unowned fragment or an unowned div
        let via_fragment = site
            .admin(|dom| {
                let frag = dom.create_fragment(None)?;
                dom.append_child(frag, foreign)?;
                dom.append_child(body, frag)
            })
            .unwrap_err();
        let via_wrapper = site
            .admin(|dom| {
                let div = dom.create_element(None, "div")?;
                dom.append_child(div, foreign)?;
                dom.append_child(body, div)
            })
            .unwrap_err();

        // THEN both inserts fail and the body is untouched
        assert!(matches!(via_fragment, DomError::WrongDocument(_)));
        assert!(matches!(via_wrapper, DomError::WrongDocument(_)));
        TreeAssertion::new()
            .children(Vec::<String>::new())
            .check(site.view(), body)
            .unwrap();
        assert_eq!(site.view().parent_node(foreign), None);
    }

    #[test]
    fn test_attached_subtree_joins_the_document() {
        // GIVEN a section > ul > li subtree built outside any document
        let mut site = Site::new("home").unwrap();
        let body = site.body;
        let page = site.page;
        let (section, list, item) = site
            .admin(|dom| {
                let section = dom.create_element(None, "section")?;
                let list = dom.create_element(None, "ul")?;
                let item = dom.create_element(None, "li")?;
                dom.append_child(list, item)?;
                dom.append_child(section, list)?;
                Ok((section, list, item))
            })
            .unwrap();

        // WHEN the section is attached to the page
        site.admin(|dom| dom.append_child(body, section)).unwrap();

        // THEN every node of the subtree is owned by the page
        for node in [section, list, item] {
            assert_eq!(site.view().owner_document(node), Some(page));
        }
        TreeAssertion::new()
            .parent(section)
            .attached()
            .check(site.view(), list)
            .unwrap();
    }

    #[test]
    fn test_ownership_controls_editing() {
        // GIVEN alice owns a section inside the body
        let mut site = Site::new("home").unwrap();
        let body = site.body;
        let (alice, bob) = run_in_transaction(&mut site.graph, |tx| {
            let alice = create_principal(tx, "alice")?;
            let bob = create_principal(tx, "bob")?;
            DomResult::Ok((alice, bob))
        })
        .unwrap();
        let section = site
            .edit(SecurityContext::User(alice), |dom| {
                let page = dom.owner_document(body);
                dom.create_element(page, "section")
            })
            .unwrap();
        site.admin(|dom| dom.append_child(body, section)).unwrap();

        // WHEN bob edits it
        let err = site
            .edit(SecurityContext::User(bob), |dom| {
                dom.set_property(section, "class", Value::from("hacked"))
            })
            .unwrap_err();

        // THEN bob is refused while alice succeeds
        assert!(matches!(err, DomError::NoModificationAllowed(_)));
        site.edit(SecurityContext::User(alice), |dom| {
            dom.set_property(section, "class", Value::from("mine"))
        })
        .unwrap();
        assert_eq!(
            site.view().get_property(section, "class"),
            Some(&Value::from("mine"))
        );
    }
}

mod normalization {
    use super::*;

    #[test]
    fn test_normalize_after_edits() {
        // GIVEN a paragraph whose text was typed in pieces
        let mut site = Site::new("home").unwrap();
        let body = site.body;
        let p = site
            .admin(|dom| {
                let page = dom.owner_document(body);
                let p = dom.create_element(page, "p")?;
                dom.append_child(body, p)?;
                for piece in ["Hel", "lo", " ", "there"] {
                    let text = dom.create_text_node(page, piece)?;
                    dom.append_child(p, text)?;
                }
                Ok(p)
            })
            .unwrap();

        // WHEN normalizing the body
        site.admin(|dom| dom.normalize(body)).unwrap();

        // THEN the paragraph holds one text node with the same content
        TreeAssertion::new()
            .children(["Hello there"])
            .text("Hello there")
            .check(site.view(), p)
            .unwrap();
    }
}
