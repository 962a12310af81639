// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 Jonathan D.A. Jewell
//! Snapshot decoding must never panic, and accepted snapshots must re-encode

#![no_main]

use graphreel::graph::Graph;
use graphreel::labels::LabelCursor;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(graph) = Graph::from_json(text, LabelCursor::new()) {
        let json = graph.to_json().expect("re-encode accepted snapshot");
        let again = Graph::from_json(&json, LabelCursor::new()).expect("decode own output");
        assert_eq!(graph.vertex_count(), again.vertex_count());
        assert_eq!(graph.edge_count(), again.edge_count());
    }
});
