use named_di::{Container, Resolver};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct RequestContext {
    id: String,
}

#[tokio::test]
async fn test_scoped_lifetime() {
    let counter = Arc::new(AtomicUsize::new(0));
    let root = Container::new();
    let scope1 = root.create_scope();
    let scope2 = root.create_scope();

    let c = counter.clone();
    scope1
        .add_scoped("request", move |_| {
            let n = c.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Ok(RequestContext { id: format!("req-{}", n) }) }
        })
        .unwrap();

    let ctx1a = scope1.get::<RequestContext>("request").await.unwrap();
    let ctx1b = scope1.get::<RequestContext>("request").await.unwrap();
    // Registered through scope1, visible to scope2 through the shared table.
    let ctx2a = scope2.get::<RequestContext>("request").await.unwrap();
    let ctx2b = scope2.get::<RequestContext>("request").await.unwrap();

    assert!(Arc::ptr_eq(&ctx1a, &ctx1b));
    assert!(Arc::ptr_eq(&ctx2a, &ctx2b));
    assert!(!Arc::ptr_eq(&ctx1a, &ctx2a));
    assert_eq!(ctx1a.id, "req-1");
    assert_eq!(ctx2a.id, "req-2");
}

#[tokio::test]
async fn test_singleton_shared_across_scopes() {
    let root = Container::new();
    root.add_singleton("clock", |_| async { Ok(String::from("utc")) });

    let from_root = root.get::<String>("clock").await.unwrap();
    for _ in 0..5 {
        let scope = root.create_scope();
        let nested = scope.create_scope();
        assert!(Arc::ptr_eq(&from_root, &scope.get::<String>("clock").await.unwrap()));
        assert!(Arc::ptr_eq(&from_root, &nested.get::<String>("clock").await.unwrap()));
        assert_eq!(scope.instance_count(), 0);
    }
    assert_eq!(root.instance_count(), 1);
}

#[tokio::test]
async fn test_singleton_registered_through_scope() {
    let root = Container::new();
    let scope = root.create_scope();
    scope.add_singleton("cache", |_| async { Ok(vec![1u8, 2, 3]) });

    let via_scope = scope.get::<Vec<u8>>("cache").await.unwrap();
    let via_root = root.get::<Vec<u8>>("cache").await.unwrap();
    assert!(Arc::ptr_eq(&via_scope, &via_root));
    assert_eq!(root.instance_count(), 1);
    assert_eq!(scope.instance_count(), 0);
}

#[tokio::test]
async fn test_scoped_factory_sees_its_own_scope() {
    struct Session {
        id: usize,
    }
    struct Repository {
        session: Arc<Session>,
    }

    let counter = Arc::new(AtomicUsize::new(0));
    let root = Container::new();
    let scope1 = root.create_scope();
    let scope2 = root.create_scope();

    let c = counter.clone();
    scope1
        .add_scoped("session", move |_| {
            let id = c.fetch_add(1, Ordering::SeqCst);
            async move { Ok(Session { id }) }
        })
        .unwrap();
    scope1
        .add_transient("repo", |ctx| async move {
            Ok(Repository { session: ctx.get::<Session>("session").await? })
        })
        .unwrap();

    let r1 = scope1.get::<Repository>("repo").await.unwrap();
    let r2 = scope2.get::<Repository>("repo").await.unwrap();
    let r3 = scope2.get::<Repository>("repo").await.unwrap();

    assert!(!Arc::ptr_eq(&r1.session, &r2.session));
    assert!(Arc::ptr_eq(&r2.session, &r3.session));
    assert_ne!(r1.session.id, r2.session.id);
}

#[tokio::test]
async fn test_sibling_scope_from_scope_has_own_store() {
    let root = Container::new();
    let scope = root.create_scope();
    scope.add_scoped("unit", |_| async { Ok(()) }).unwrap();

    let sibling = scope.create_scope();
    let a = scope.get::<()>("unit").await.unwrap();
    let b = sibling.get::<()>("unit").await.unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert!(Container::ptr_eq(&sibling.root(), &root));
}
