// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Meshcut Team

//! Boundary contract tests: ordered validation, two-phase query laws,
//! diagnostic reporting and release semantics.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use meshcut::{
    create_context, dispatch, get_component_data, get_connected_components, get_context_info,
    last_api_log, release_connected_components, release_context, set_debug_callback,
    set_debug_filter, ComponentData, ComponentHandle, ComponentType, ContextFlags, ContextInfo,
    DebugSeverity, DebugSource, DebugType, DispatchFlags, MeshView, ResultCode,
};

const TRIANGLE_VERTICES: [f32; 9] = [0.0, 0.0, -1.0, 2.0, 0.0, -1.0, 1.0, 0.0, 2.0];
const TRIANGLE_FACES: [u32; 3] = [0, 1, 2];

const CUT_VERTICES: [f32; 9] = [-5.0, -5.0, 0.0, 5.0, -5.0, 0.0, 0.0, 5.0, 0.0];
const CUT_FACES: [u32; 3] = [0, 1, 2];

fn src_mesh() -> MeshView<'static> {
    MeshView::triangles_f32(&TRIANGLE_VERTICES, &TRIANGLE_FACES)
}

fn cut_mesh() -> MeshView<'static> {
    MeshView::triangles_f32(&CUT_VERTICES, &CUT_FACES)
}

#[test]
fn validation_runs_in_documented_order() -> Result<()> {
    let ctx = create_context(ContextFlags::empty())?;

    // Everything about this request is wrong; the reported message must
    // come from the first failing check each time one is fixed.
    let empty = MeshView::default();
    assert_eq!(
        dispatch(ctx, DispatchFlags::empty(), &empty, &empty),
        Err(ResultCode::InvalidValue)
    );
    assert!(last_api_log().contains("dispatch flags unspecified"));

    let contradictory = DispatchFlags::VERTEX_ARRAY_FLOAT
        | DispatchFlags::REQUIRE_THROUGH_CUTS
        | DispatchFlags::FILTER_FRAGMENT_LOCATION_UNDEFINED;
    assert_eq!(
        dispatch(ctx, contradictory, &empty, &empty),
        Err(ResultCode::InvalidValue)
    );
    assert!(last_api_log().contains("mutually-exclusive"));

    assert_eq!(
        dispatch(ctx, DispatchFlags::REQUIRE_THROUGH_CUTS, &empty, &empty),
        Err(ResultCode::InvalidValue)
    );
    assert!(last_api_log().contains("vertex array type unspecified"));

    assert_eq!(
        dispatch(ctx, DispatchFlags::VERTEX_ARRAY_FLOAT, &empty, &empty),
        Err(ResultCode::InvalidValue)
    );
    assert!(last_api_log().contains("source-mesh vertex-position array"));

    // Source fixed: the first cut-mesh check fires next.
    assert_eq!(
        dispatch(ctx, DispatchFlags::VERTEX_ARRAY_FLOAT, &src_mesh(), &empty),
        Err(ResultCode::InvalidValue)
    );
    assert!(last_api_log().contains("cut-mesh vertex-position array"));

    release_context(ctx)?;
    Ok(())
}

#[test]
fn mutual_exclusion_law_creates_no_components() -> Result<()> {
    let ctx = create_context(ContextFlags::empty())?;
    let flags = DispatchFlags::VERTEX_ARRAY_FLOAT
        | DispatchFlags::REQUIRE_THROUGH_CUTS
        | DispatchFlags::FILTER_FRAGMENT_LOCATION_UNDEFINED;
    assert_eq!(
        dispatch(ctx, flags, &src_mesh(), &cut_mesh()),
        Err(ResultCode::InvalidValue)
    );
    assert_eq!(get_connected_components(ctx, ComponentType::ALL, None)?, 0);
    release_context(ctx)?;
    Ok(())
}

#[test]
fn vertex_count_boundary_two_fails_three_proceeds() -> Result<()> {
    let ctx = create_context(ContextFlags::empty())?;

    let two_vertices: [f32; 6] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0];
    let short = MeshView::triangles_f32(&two_vertices, &TRIANGLE_FACES);
    assert_eq!(
        dispatch(ctx, DispatchFlags::VERTEX_ARRAY_FLOAT, &short, &cut_mesh()),
        Err(ResultCode::InvalidValue)
    );
    assert!(last_api_log().contains("invalid source-mesh vertex count"));

    // With three vertices the call passes that check and the whole
    // pipeline succeeds.
    dispatch(
        ctx,
        DispatchFlags::VERTEX_ARRAY_FLOAT,
        &src_mesh(),
        &cut_mesh(),
    )?;
    assert!(last_api_log().is_empty());

    release_context(ctx)?;
    Ok(())
}

#[test]
fn both_precision_flags_are_not_rejected() -> Result<()> {
    // Only the absence of both precision flags is a documented error.
    let ctx = create_context(ContextFlags::empty())?;
    let flags = DispatchFlags::VERTEX_ARRAY_FLOAT | DispatchFlags::VERTEX_ARRAY_DOUBLE;
    dispatch(ctx, flags, &src_mesh(), &cut_mesh())?;
    release_context(ctx)?;
    Ok(())
}

#[test]
fn context_info_obeys_two_phase_laws() -> Result<()> {
    let ctx = create_context(ContextFlags::DEBUG)?;

    let required = get_context_info(ctx, ContextInfo::CONTEXT_FLAGS, None)?;
    assert_eq!(required, 4);

    let mut exact = vec![0u8; required as usize];
    get_context_info(ctx, ContextInfo::CONTEXT_FLAGS, Some(&mut exact))?;
    let echoed = u32::from_ne_bytes(exact[..4].try_into()?);
    assert_eq!(echoed, ContextFlags::DEBUG.bits());

    // An undersized buffer fails and is not written to.
    let mut small = [0xABu8; 2];
    assert_eq!(
        get_context_info(ctx, ContextInfo::CONTEXT_FLAGS, Some(&mut small)),
        Err(ResultCode::InvalidValue)
    );
    assert_eq!(small, [0xAB, 0xAB]);
    assert!(last_api_log().contains("invalid byte size"));

    // Unknown info ids are rejected.
    let bogus = ContextInfo::from_bits_retain(1 << 9);
    assert_eq!(
        get_context_info(ctx, bogus, None),
        Err(ResultCode::InvalidValue)
    );

    release_context(ctx)?;
    Ok(())
}

#[test]
fn debug_filter_rejects_out_of_set_values_without_state_change() -> Result<()> {
    let ctx = create_context(ContextFlags::empty())?;

    let events: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    set_debug_callback(
        ctx,
        Box::new(move |_source, _ty, _severity, message| {
            sink.lock().unwrap().push(message.to_string());
        }),
    )?;

    // Out-of-set severity: rejected before any filter mutation. The
    // rejected control call itself is not forwarded as a debug event.
    let bogus = DebugSeverity::from_bits_retain(0x1000);
    assert_eq!(
        set_debug_filter(ctx, DebugSource::ALL, DebugType::ALL, bogus, true),
        Err(ResultCode::InvalidValue)
    );
    assert!(last_api_log().contains("invalid debug severity"));
    assert!(events.lock().unwrap().is_empty());

    // The default all-pass filter still forwards error events.
    let empty = MeshView::default();
    let _ = dispatch(ctx, DispatchFlags::empty(), &empty, &empty);
    assert_eq!(events.lock().unwrap().len(), 1);

    // A valid disable of error events silences them.
    set_debug_filter(
        ctx,
        DebugSource::ALL,
        DebugType::ERROR,
        DebugSeverity::ALL,
        false,
    )?;
    let _ = dispatch(ctx, DispatchFlags::empty(), &empty, &empty);
    assert_eq!(events.lock().unwrap().len(), 1);

    release_context(ctx)?;
    Ok(())
}

#[test]
fn debug_source_and_type_are_validated_too() -> Result<()> {
    let ctx = create_context(ContextFlags::empty())?;
    assert_eq!(
        set_debug_filter(
            ctx,
            DebugSource::from_bits_retain(0xF0),
            DebugType::ALL,
            DebugSeverity::ALL,
            true
        ),
        Err(ResultCode::InvalidValue)
    );
    assert_eq!(
        set_debug_filter(
            ctx,
            DebugSource::ALL,
            DebugType::from_bits_retain(0xF0),
            DebugSeverity::ALL,
            true
        ),
        Err(ResultCode::InvalidValue)
    );
    release_context(ctx)?;
    Ok(())
}

#[test]
fn enumerate_requires_a_type_filter() -> Result<()> {
    let ctx = create_context(ContextFlags::empty())?;
    assert_eq!(
        get_connected_components(ctx, ComponentType::empty(), None),
        Err(ResultCode::InvalidValue)
    );
    release_context(ctx)?;
    Ok(())
}

#[test]
fn empty_release_list_is_a_contract_violation() -> Result<()> {
    let ctx = create_context(ContextFlags::empty())?;
    assert_eq!(
        release_connected_components(ctx, Some(&[])),
        Err(ResultCode::InvalidValue)
    );
    // Release-all spelled properly is fine even with nothing to release.
    release_connected_components(ctx, None)?;
    release_context(ctx)?;
    Ok(())
}

#[test]
fn stale_context_handle_fails_everywhere() -> Result<()> {
    let ctx = create_context(ContextFlags::empty())?;
    release_context(ctx)?;

    assert_eq!(release_context(ctx), Err(ResultCode::InvalidValue));
    assert_eq!(
        dispatch(
            ctx,
            DispatchFlags::VERTEX_ARRAY_FLOAT,
            &src_mesh(),
            &cut_mesh()
        ),
        Err(ResultCode::InvalidValue)
    );
    assert_eq!(
        get_connected_components(ctx, ComponentType::ALL, None),
        Err(ResultCode::InvalidValue)
    );
    assert_eq!(
        set_debug_callback(ctx, Box::new(|_, _, _, _| {})),
        Err(ResultCode::InvalidValue)
    );
    assert!(last_api_log().contains("context handle invalid"));
    Ok(())
}

#[test]
fn component_handles_are_scoped_to_their_context() -> Result<()> {
    let owner = create_context(ContextFlags::empty())?;
    let other = create_context(ContextFlags::empty())?;

    dispatch(
        owner,
        DispatchFlags::VERTEX_ARRAY_FLOAT,
        &src_mesh(),
        &cut_mesh(),
    )?;
    let count = get_connected_components(owner, ComponentType::ALL, None)?;
    assert!(count > 0);

    let mut handles = vec![ComponentHandle::default(); count as usize];
    get_connected_components(owner, ComponentType::ALL, Some(&mut handles))?;

    // Using the owner's handle against another context is detected.
    assert_eq!(
        get_component_data(other, handles[0], ComponentData::VERTEX_COUNT, None),
        Err(ResultCode::InvalidValue)
    );
    assert_eq!(
        release_connected_components(other, Some(&handles[..1])),
        Err(ResultCode::InvalidValue)
    );

    release_context(owner)?;
    release_context(other)?;
    Ok(())
}

#[test]
fn api_log_belongs_to_one_thread() -> Result<()> {
    let ctx = create_context(ContextFlags::empty())?;
    let empty = MeshView::default();
    let _ = dispatch(ctx, DispatchFlags::empty(), &empty, &empty);
    assert!(last_api_log().contains("dispatch flags unspecified"));

    // Another thread sees its own (empty) buffer, not this thread's.
    let seen_elsewhere = std::thread::spawn(last_api_log)
        .join()
        .expect("log reader thread panicked");
    assert!(seen_elsewhere.is_empty());

    // And reading from that thread left this thread's message alone.
    assert!(last_api_log().contains("dispatch flags unspecified"));

    release_context(ctx)?;
    Ok(())
}

#[test]
fn api_log_is_reset_by_the_next_call() -> Result<()> {
    let ctx = create_context(ContextFlags::empty())?;
    let empty = MeshView::default();
    let _ = dispatch(ctx, DispatchFlags::empty(), &empty, &empty);
    assert!(!last_api_log().is_empty());

    get_connected_components(ctx, ComponentType::ALL, None)?;
    assert!(last_api_log().is_empty());

    release_context(ctx)?;
    Ok(())
}
