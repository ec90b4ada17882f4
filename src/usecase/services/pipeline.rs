use tracing::debug;

use crate::domain::entities::definition::{sanitize_against_known_keys, ViewDefinition};
use crate::domain::entities::saved_view::ViewId;
use crate::domain::surface::fixed::enforce_visible;
use crate::domain::surface::reconciler::apply_columns;
use crate::usecase::ports::host::{ApplyRequest, GridHost, PickerUpdate, Presentation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActivateOptions {
    pub preserve_picker_value: bool,
    pub from_columns_modal: bool,
}

/// Activates a definition on the host, returning the sanitized definition.
///
/// The order is fixed: columns, host state, presentation, post-apply hook,
/// columns again, fixed columns. `apply_state` and `after_apply` may rebuild
/// rows, so the second column pass is what leaves header and body aligned.
pub fn activate<H: GridHost + ?Sized>(
    host: &mut H,
    view_id: Option<ViewId>,
    name: &str,
    definition: &ViewDefinition,
    options: ActivateOptions,
) -> ViewDefinition {
    let known_keys = host.all_column_keys();
    let sanitized = sanitize_against_known_keys(definition, &known_keys);
    debug!(?view_id, name, "activating view");

    apply_columns(host.surface_mut(), &sanitized, &known_keys);

    host.apply_state(ApplyRequest {
        view_id,
        name,
        definition: &sanitized,
        from_columns_modal: options.from_columns_modal,
    });

    let picker = if options.preserve_picker_value {
        PickerUpdate::Preserve
    } else {
        PickerUpdate::Select(view_id)
    };
    host.present(&Presentation {
        label: name.to_string(),
        picker,
    });

    host.after_apply();

    let known_keys = host.all_column_keys();
    apply_columns(host.surface_mut(), &sanitized, &known_keys);
    enforce_visible(host.surface_mut());

    sanitized
}
