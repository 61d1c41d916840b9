// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Explorer Insights

//! Cross-cutting plugin registration.
//!
//! Plugins are held in an explicit, statically-compiled list and installed in
//! declaration order during bootstrap, before any route handles traffic. The
//! list replaces runtime directory scanning: adding a plugin means adding an
//! entry here, and the order below is the registration order.

use axum::Router;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

pub mod etag;

/// A named plugin entry in the registration list.
pub struct PluginDef {
    pub name: &'static str,
    install: fn(Router) -> Router,
}

/// The registration list. Order is semantically significant.
pub const PLUGINS: &[PluginDef] = &[
    PluginDef {
        name: "trace",
        install: trace,
    },
    PluginDef {
        name: "request-id",
        install: request_id,
    },
    PluginDef {
        name: "cors",
        install: cors,
    },
    PluginDef {
        name: "etag",
        install: conditional_get,
    },
];

/// Install every plugin in list order, logging each registration.
pub fn install_all(router: Router) -> Router {
    PLUGINS.iter().fold(router, |router, plugin| {
        tracing::debug!(plugin = plugin.name, "registering plugin");
        (plugin.install)(router)
    })
}

fn trace(router: Router) -> Router {
    router.layer(TraceLayer::new_for_http())
}

fn request_id(router: Router) -> Router {
    // Set must wrap Propagate so generated ids are echoed back to clients.
    router
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn cors(router: Router) -> Router {
    router.layer(CorsLayer::permissive())
}

fn conditional_get(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(etag::set_etag))
}
