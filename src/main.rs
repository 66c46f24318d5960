// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

//! A thin demonstration client built on top of the dispatcher: connects,
//! establishes a session, creates a node, watches it, and tears down. Not a
//! full ZooKeeper client API — see §1 ("Out of scope") — just enough to
//! exercise `Dispatcher::submit` end to end against a real server.

use std::sync::Arc;

use anyhow::{Context, Result};
use bytes::BytesMut;
use tokio_util::sync::CancellationToken;
use tracing::info;
use zk_dispatcher_rs::{
    cfg::{cli::resolve_config_path, config::Config, logger::init_logger},
    client::transport::{Transport, TcpTransport},
    connection::DefaultConnectionManager,
    dispatcher::{Dispatcher, SubmissionPacket},
    models::{
        opcode::OpCode,
        requests::{ConnectRequest, CreateRequest, ExistsRequest, GetDataRequest},
        acl::open_unsafe_acl,
    },
    session::DefaultSessionManager,
    watch_registry::DefaultWatchRegistry,
};

#[tokio::main]
async fn main() -> Result<()> {
    let _logger_guard = init_logger("config/logger.yaml")?;

    let cfg = resolve_config_path("config/zk-dispatcher.yaml")
        .and_then(Config::load_from_file)
        .context("failed to resolve or load config")?;

    let cancel = CancellationToken::new();
    let transport = TcpTransport::connect(
        &cfg.server.address,
        cfg.server.connect_timeout,
        cfg.server.io_timeout,
        cancel.clone(),
    )
    .await
    .context("failed to connect to ensemble member")?;
    info!(address = %cfg.server.address, "connected to ensemble member");

    let dispatcher = Dispatcher::new(Arc::new(transport) as Arc<dyn Transport>);
    dispatcher
        .submit(SubmissionPacket::ConfigureManagers {
            connection: Arc::new(DefaultConnectionManager::new()),
            session: Arc::new(DefaultSessionManager::new()),
            watches: Arc::new(DefaultWatchRegistry::new()),
        })
        .await
        .context("configure failed")?;
    dispatcher
        .submit(SubmissionPacket::ConfigureDone)
        .await
        .context("configure_done failed")?;

    let connect_reply = dispatcher
        .submit(SubmissionPacket::Connect(ConnectRequest {
            protocol_version: 0,
            last_zxid_seen: 0,
            timeout: cfg.session.timeout_millis,
            session_id: 0,
            passwd: Vec::new(),
            read_only: cfg.session.read_only,
        }))
        .await
        .context("session establishment failed")?;
    info!(?connect_reply, "session established");

    let path = "/zk-dispatcher-demo";

    let mut create_body = BytesMut::new();
    CreateRequest {
        path: path.into(),
        data: b"hello".to_vec(),
        acl: open_unsafe_acl(),
        flags: 0,
    }
    .encode(&mut create_body);
    let create_reply = dispatcher
        .submit(SubmissionPacket::Protocol(OpCode::Create, create_body.freeze()))
        .await
        .context("create failed")?;
    info!(?create_reply, "node created");

    let mut exists_body = BytesMut::new();
    ExistsRequest { path: path.into(), watch: true }.encode(&mut exists_body);
    let exists_reply = dispatcher
        .submit(SubmissionPacket::Protocol(OpCode::Exists, exists_body.freeze()))
        .await
        .context("exists failed")?;
    info!(?exists_reply, "watch armed on node");

    let mut get_data_body = BytesMut::new();
    GetDataRequest { path: path.into(), watch: false }.encode(&mut get_data_body);
    let get_data_reply = dispatcher
        .submit(SubmissionPacket::Protocol(OpCode::GetData, get_data_body.freeze()))
        .await
        .context("get_data failed")?;
    info!(?get_data_reply, "node data read back");

    Ok(())
}
