#![no_main]

use libfuzzer_sys::fuzz_target;
use nodeboard_types::{Dataset, LatencyTier};
use nodeboard_web::{country_options, visible_nodes, FilterState};

fuzz_target!(|data: &[u8]| {
    // Decoding must never panic, whatever the producer wrote.
    let Ok(dataset) = Dataset::from_json(data) else {
        return;
    };

    for node in &dataset.nodes {
        match node.latency_ms {
            Some(ms) => assert_eq!(node.tier(), LatencyTier::from_millis(ms)),
            None => {
                assert_eq!(node.tier(), LatencyTier::Poor);
                assert_eq!(node.latency_label(), "--");
            }
        }
        let _ = node.address();
    }

    let mut filter = FilterState::new();
    assert_eq!(visible_nodes(&dataset, &filter).len(), dataset.len());
    if let Some(first) = dataset.nodes.first() {
        filter.set_search(first.name.clone());
        assert!(visible_nodes(&dataset, &filter).len() <= dataset.len());
    }

    let countries = country_options(&dataset);
    assert!(countries.windows(2).all(|w| w[0] < w[1]));
});
