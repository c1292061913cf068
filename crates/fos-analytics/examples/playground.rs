//! Headless walkthrough of automatic tracking
//!
//! Run with `RUST_LOG=debug` to see tracker internals. Events are printed
//! instead of being sent to a collector.

use fos_analytics::{
    DownloadsOptions, EventOptions, EventPayload, Tracker, TrackerConfig, TrackerResult, Transport,
};
use fos_dom::MouseEvent;
use fos_window::{PushStateArgs, Window};
use std::rc::Rc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

struct Stdout;

impl Transport for Stdout {
    fn send(&self, api_host: &str, payload: &EventPayload) -> TrackerResult<()> {
        println!("{} <- {}", fos_analytics::event_endpoint(api_host), payload.to_json()?);
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = TrackerConfig::from_json(r#"{"domain": "shop.example.com", "hashMode": false}"#)?;
    let tracker = Tracker::with_transport(config, Rc::new(Stdout));
    let window = Window::new("https://shop.example.com/")?.with_referrer("https://search.example/");

    let nav = window.create_element("nav");
    let partner = window.create_link("https://partner.example/deal")?;
    let manual = window.create_link("/docs/manual.pdf")?;
    window.append_child(nav, partner)?;
    window.append_child(nav, manual)?;
    window.append_to_body(nav)?;

    let pageviews = tracker.enable_auto_pageviews(&window, EventOptions::new());
    let outbound = tracker.enable_auto_outbound_tracking(&window, EventOptions::new().with_prop("placement", "nav"));
    let downloads = tracker.enable_auto_file_downloads_tracking(&window, DownloadsOptions::default(), EventOptions::new());
    window.run_until_idle();

    window.push_state(PushStateArgs::new("/cart"))?;
    window.run_until_idle();

    // Added after install, picked up by the observer
    let late = window.create_link("https://blog.example/launch")?;
    window.append_to_body(late)?;
    window.run_until_idle();
    println!("outbound links tracked: {}", outbound.tracked().len());

    window.dispatch_mouse_event(manual, MouseEvent::middle_click());
    window.dispatch_mouse_event(late, MouseEvent::click());
    window.run_until_idle();
    window.advance(Duration::from_secs(1));

    for navigation in window.navigations() {
        println!("navigated to {} ({}) at {:?}", navigation.url, navigation.target, navigation.at);
    }

    pageviews.cleanup(&window);
    outbound.cleanup(&window);
    downloads.cleanup(&window);
    println!("observers left: {}", window.mutation_observer_count());

    Ok(())
}
