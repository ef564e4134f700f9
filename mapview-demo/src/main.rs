use mapview::prelude::*;

/// Drives a map view against the headless backend and prints what the store receives
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let (store, messages) = ChannelStore::new(MapState::new(LatLng::new(37.7749, -122.4194), 12.0));
    let provider = HeadlessProvider::new();
    let surface = provider.surface();

    let mut view = MapViewBuilder::new(provider)
        .with_store(store)
        .build()?;

    let container = unique_container_id();
    view.load_map(&container).await?;
    println!("Loaded '{}' into {}", view.provider_name(), container);

    let mut clicks = view.marker_clicked();

    let locations = [
        ("nyc", "New York", LatLng::new(40.7128, -74.0060)),
        ("london", "London", LatLng::new(51.5074, -0.1278)),
        ("tokyo", "Tokyo", LatLng::new(35.6762, 139.6503)),
    ];
    let last = locations.len() - 1;
    for (i, (name, title, position)) in locations.iter().enumerate() {
        view.stream_add_marker(name, &MarkerSpec::new(*title, *position), i == last)?;
    }

    view.set_center_coordinates(LatLng::new(51.5074, -0.1278))?;
    view.set_zoom(5.0)?;

    surface.click("tokyo");
    if let Some(name) = clicks.next().await {
        println!("Marker clicked: {}", name);
    }

    view.remove_marker("nyc")?;
    view.remove_map()?;

    for message in messages.try_iter() {
        match message {
            StoreMessage::UpdateMapState(state) => println!(
                "state: center ({:.4}, {:.4}) zoom {:.1} bounds {:?}",
                state.center.lat, state.center.lng, state.zoom, state.bounds
            ),
            StoreMessage::NewLog(record) => {
                println!("log [{:?}] {}", record.level, record.message)
            }
        }
    }

    log::info!("headless backend saw {} load(s)", surface.load_count());
    Ok(())
}
