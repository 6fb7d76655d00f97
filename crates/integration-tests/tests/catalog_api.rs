//! Catalog endpoint tests.

#![allow(clippy::unwrap_used)]

use marigold_integration_tests::TestContext;
use serde_json::Value;

#[tokio::test]
async fn test_services_are_display_shaped() {
    let ctx = TestContext::new().await;
    let services: Value = ctx.get_json("/api/services").await;

    let services = services.as_array().unwrap();
    assert_eq!(services.len(), 2);
    assert_eq!(services[0]["id"], "svc1");
    assert_eq!(services[0]["name"], "Haircut");
    // prices come formatted for display
    assert_eq!(services[0]["price"], "$45.00");
    assert_eq!(services[0]["duration_minutes"], 45);
    // missing description passes through as null, not an error
    assert!(services[1]["description"].is_null());
}

#[tokio::test]
async fn test_stylists_list() {
    let ctx = TestContext::new().await;
    let stylists: Value = ctx.get_json("/api/stylists").await;

    let stylists = stylists.as_array().unwrap();
    assert_eq!(stylists.len(), 2);
    assert_eq!(stylists[0]["id"], "sty1");
    assert_eq!(stylists[0]["specializations"][0], "color");
    // specializations default to empty, not null
    assert_eq!(stylists[1]["specializations"], Value::Array(vec![]));
}

#[tokio::test]
async fn test_empty_stylist_roster_is_valid() {
    let ctx = TestContext::new().await;
    ctx.stub.set_empty_stylists(true);

    let stylists: Value = ctx.get_json("/api/stylists").await;
    assert_eq!(stylists.as_array().unwrap().len(), 0);
}
