//! Integration tests for database queries.

mod common;

use common::{collection, link, member, preserve, setup_db, user};
use linkwarden::db::{
    create_session, delete_expired_sessions, get_collection_members, get_collections_for_user,
    get_link, get_links, get_or_create_tag, get_pinned_links, get_public_collection,
    get_tags_for_collection, pin_link, reset_link_artifacts, tag_link, update_link, LinkQuery,
    LinkUpdate, SearchFilter, Sort,
};
use linkwarden::permission::{capability, Capability};

fn names(links: &[linkwarden::db::LinkWithTags]) -> Vec<&str> {
    links.iter().map(|l| l.link.name.as_str()).collect()
}

#[tokio::test]
async fn test_get_links_sorts_and_paginates() {
    let (db, _temp_dir) = setup_db().await;
    let owner = user(&db, "owner").await;
    let coll = collection(&db, owner, "Books", true).await;
    let c = link(&db, coll, "charlie", Some("https://c.example")).await;
    let a = link(&db, coll, "Alpha", Some("https://a.example")).await;
    link(&db, coll, "bravo", Some("https://b.example")).await;

    let query = |sort, cursor, limit| LinkQuery {
        collection_id: coll,
        sort,
        cursor,
        limit,
        ..LinkQuery::default()
    };

    let az = get_links(db.pool(), &query(Sort::NameAZ, None, None)).await.unwrap();
    assert_eq!(names(&az), vec!["Alpha", "bravo", "charlie"]);

    let za = get_links(db.pool(), &query(Sort::NameZA, None, None)).await.unwrap();
    assert_eq!(names(&za), vec!["charlie", "bravo", "Alpha"]);

    // Same-second inserts fall back to id order.
    let oldest = get_links(db.pool(), &query(Sort::DateOldestFirst, None, None)).await.unwrap();
    assert_eq!(oldest[0].link.id, c);

    let page = get_links(db.pool(), &query(Sort::NameAZ, Some(a), Some(1))).await.unwrap();
    assert_eq!(names(&page), vec!["bravo"]);

    let past_end = get_links(db.pool(), &query(Sort::NameAZ, Some(c), None)).await.unwrap();
    assert!(past_end.is_empty());

    // Unknown cursor yields nothing rather than restarting.
    let unknown = get_links(db.pool(), &query(Sort::NameAZ, Some(9999), None)).await.unwrap();
    assert!(unknown.is_empty());
}

#[tokio::test]
async fn test_cursor_pages_cover_every_link_once() {
    let (db, _temp_dir) = setup_db().await;
    let owner = user(&db, "owner").await;
    let coll = collection(&db, owner, "Books", true).await;
    let other = collection(&db, owner, "Other", true).await;
    let foreign = link(&db, other, "Elsewhere", None).await;

    // Duplicate names exercise the id tie-break.
    let mut expected = Vec::new();
    for name in ["b", "a", "b", "c", "a"] {
        expected.push(link(&db, coll, name, None).await);
    }

    for sort in Sort::ALL {
        let mut seen = Vec::new();
        let mut cursor = None;
        loop {
            let page = get_links(
                db.pool(),
                &LinkQuery {
                    collection_id: coll,
                    sort,
                    cursor,
                    limit: Some(2),
                    ..LinkQuery::default()
                },
            )
            .await
            .unwrap();
            let Some(last) = page.last() else { break };
            cursor = Some(last.link.id);
            seen.extend(page.iter().map(|l| l.link.id));
        }

        let all = get_links(
            db.pool(),
            &LinkQuery {
                collection_id: coll,
                sort,
                ..LinkQuery::default()
            },
        )
        .await
        .unwrap();
        let unpaged: Vec<i64> = all.iter().map(|l| l.link.id).collect();
        assert_eq!(seen, unpaged, "{sort:?}");

        let mut sorted = seen.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, expected, "{sort:?}");
    }

    // A link from another collection is not a valid cursor.
    let query = LinkQuery {
        collection_id: coll,
        cursor: Some(foreign),
        ..LinkQuery::default()
    };
    assert!(get_links(db.pool(), &query).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_respects_field_filter() {
    let (db, _temp_dir) = setup_db().await;
    let owner = user(&db, "owner").await;
    let coll = collection(&db, owner, "Books", true).await;
    let by_name = link(&db, coll, "Rust book", Some("https://doc.example")).await;
    let by_tag = link(&db, coll, "Something else", Some("https://other.example")).await;
    let tag = get_or_create_tag(db.pool(), "rustlang", owner).await.unwrap();
    tag_link(db.pool(), by_tag, tag).await.unwrap();
    let by_text = link(&db, coll, "Third", Some("https://third.example")).await;
    preserve(&db, by_text).await;

    let search = |q: &str, filter| LinkQuery {
        collection_id: coll,
        sort: Sort::DateOldestFirst,
        search: Some(q.to_string()),
        filter,
        ..LinkQuery::default()
    };

    let all = get_links(db.pool(), &search("rust", SearchFilter::default())).await.unwrap();
    let ids: Vec<i64> = all.iter().map(|l| l.link.id).collect();
    assert_eq!(ids, vec![by_name, by_tag]);

    let name_only = SearchFilter {
        name: true,
        url: false,
        description: false,
        text_content: false,
        tags: false,
    };
    let found = get_links(db.pool(), &search("rust", name_only)).await.unwrap();
    assert_eq!(names(&found), vec!["Rust book"]);

    let text = get_links(db.pool(), &search("page text", SearchFilter::default())).await.unwrap();
    assert_eq!(names(&text), vec!["Third"]);

    // LIKE wildcards in the query are matched literally.
    let literal = get_links(db.pool(), &search("%", SearchFilter::default())).await.unwrap();
    assert!(literal.is_empty());

    let nothing = SearchFilter {
        name: false,
        url: false,
        description: false,
        text_content: false,
        tags: false,
    };
    assert!(get_links(db.pool(), &search("rust", nothing)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_tags_and_pins_are_attached() {
    let (db, _temp_dir) = setup_db().await;
    let owner = user(&db, "owner").await;
    let other = user(&db, "other").await;
    let coll = collection(&db, owner, "Books", true).await;
    let id = link(&db, coll, "Tagged", Some("https://t.example")).await;

    let mine = get_or_create_tag(db.pool(), "news", owner).await.unwrap();
    assert_eq!(get_or_create_tag(db.pool(), "news", owner).await.unwrap(), mine);
    let theirs = get_or_create_tag(db.pool(), "news", other).await.unwrap();
    assert_ne!(mine, theirs);

    tag_link(db.pool(), id, mine).await.unwrap();
    tag_link(db.pool(), id, mine).await.unwrap();
    tag_link(db.pool(), id, theirs).await.unwrap();

    let tags = get_tags_for_collection(db.pool(), coll).await.unwrap();
    assert_eq!(tags.len(), 2);

    pin_link(db.pool(), owner, id).await.unwrap();
    pin_link(db.pool(), owner, id).await.unwrap();

    let query = LinkQuery {
        collection_id: coll,
        viewer_id: Some(owner),
        ..LinkQuery::default()
    };
    let links = get_links(db.pool(), &query).await.unwrap();
    assert_eq!(links[0].tags.len(), 2);
    assert!(links[0].pinned);

    let anonymous = LinkQuery {
        collection_id: coll,
        ..LinkQuery::default()
    };
    assert!(!get_links(db.pool(), &anonymous).await.unwrap()[0].pinned);

    assert_eq!(get_pinned_links(db.pool(), owner).await.unwrap().len(), 1);
    assert!(get_pinned_links(db.pool(), other).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_pins_hidden_after_access_is_lost() {
    let (db, _temp_dir) = setup_db().await;
    let owner = user(&db, "owner").await;
    let friend = user(&db, "friend").await;
    let coll = collection(&db, owner, "Private", false).await;
    member(&db, friend, coll, false, false).await;
    let id = link(&db, coll, "Secret plan", Some("https://plan.example")).await;

    pin_link(db.pool(), friend, id).await.unwrap();
    pin_link(db.pool(), owner, id).await.unwrap();
    assert_eq!(get_pinned_links(db.pool(), friend).await.unwrap().len(), 1);

    sqlx::query("DELETE FROM users_and_collections WHERE user_id = ? AND collection_id = ?")
        .bind(friend)
        .bind(coll)
        .execute(db.pool())
        .await
        .unwrap();

    assert!(get_pinned_links(db.pool(), friend).await.unwrap().is_empty());
    assert_eq!(get_pinned_links(db.pool(), owner).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_public_collection_hides_private() {
    let (db, _temp_dir) = setup_db().await;
    let owner = user(&db, "owner").await;
    let friend = user(&db, "friend").await;
    let public = collection(&db, owner, "Open", true).await;
    let private = collection(&db, owner, "Closed", false).await;
    member(&db, friend, public, true, false).await;
    link(&db, public, "One", None).await;
    link(&db, public, "Two", None).await;

    let found = get_public_collection(db.pool(), public).await.unwrap().unwrap();
    assert_eq!(found.link_count, 2);
    assert_eq!(found.members.len(), 1);
    assert_eq!(found.members[0].user.username, "friend");
    assert!(found.members[0].member.can_update);

    assert!(get_public_collection(db.pool(), private).await.unwrap().is_none());
    assert!(get_public_collection(db.pool(), 9999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_member_upsert_and_capability() {
    let (db, _temp_dir) = setup_db().await;
    let owner = user(&db, "owner").await;
    let friend = user(&db, "friend").await;
    let stranger = user(&db, "stranger").await;
    let coll = collection(&db, owner, "Shared", false).await;

    member(&db, friend, coll, false, false).await;
    assert_eq!(
        capability(db.pool(), friend, coll).await.unwrap(),
        Capability::MemberReadOnly
    );

    member(&db, friend, coll, true, false).await;
    assert_eq!(get_collection_members(db.pool(), coll).await.unwrap().len(), 1);
    assert_eq!(
        capability(db.pool(), friend, coll).await.unwrap(),
        Capability::MemberWithUpdate
    );

    assert_eq!(capability(db.pool(), owner, coll).await.unwrap(), Capability::Owner);
    assert_eq!(capability(db.pool(), stranger, coll).await.unwrap(), Capability::NoAccess);

    let visible = get_collections_for_user(db.pool(), friend).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert!(get_collections_for_user(db.pool(), stranger).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reset_keeps_link_fields() {
    let (db, _temp_dir) = setup_db().await;
    let owner = user(&db, "owner").await;
    let coll = collection(&db, owner, "Books", false).await;
    let id = link(&db, coll, "Name", Some("https://example.com")).await;
    preserve(&db, id).await;

    reset_link_artifacts(db.pool(), id).await.unwrap();

    let after = get_link(db.pool(), id).await.unwrap().unwrap();
    assert!(after.awaiting_preservation());
    assert_eq!(after.name, "Name");
    assert_eq!(after.url.as_deref(), Some("https://example.com"));
    assert_eq!(after.text_content.as_deref(), Some("page text"));

    let updated = update_link(
        db.pool(),
        id,
        &LinkUpdate {
            name: Some("Renamed".to_string()),
            ..LinkUpdate::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.url.as_deref(), Some("https://example.com"));
}

#[tokio::test]
async fn test_delete_expired_sessions() {
    let (db, _temp_dir) = setup_db().await;
    let owner = user(&db, "owner").await;
    create_session(db.pool(), owner, "old", "2000-01-01T00:00:00+00:00").await.unwrap();
    create_session(db.pool(), owner, "new", "2999-01-01T00:00:00+00:00").await.unwrap();

    let removed = delete_expired_sessions(db.pool(), "2024-06-01T00:00:00+00:00")
        .await
        .unwrap();
    assert_eq!(removed, 1);
}
