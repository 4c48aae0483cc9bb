//! Text rendering of the display state.

use alloy_primitives::Address;
use session::{OperationKind, UiState};

/// Shorten an address to its first 16 and last 8 characters.
pub fn short_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}...{}", &full[..16], &full[full.len() - 8..])
}

/// Caption of the control that triggers `kind`.
pub const fn label(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Connect => "Kết nối ví",
        OperationKind::CheckBalance => "Kiểm tra số dư",
        OperationKind::Transfer => "Chuyển",
        OperationKind::Approve => "Phê duyệt",
        OperationKind::TransferFrom => "Chuyển thay mặt",
        OperationKind::Mint => "Mint",
        OperationKind::Burn => "Burn",
    }
}

/// Render the state the way the form shows it.
pub fn render(title: &str, state: &UiState) -> String {
    let mut lines = vec![title.to_string()];

    if let Some(error) = &state.error {
        lines.push(format!("Lỗi: {error}"));
    }
    if let Some(notice) = &state.notice {
        lines.push(notice.clone());
    }

    if let Some(session) = &state.session {
        let role = if session.is_owner { " (chủ sở hữu)" } else { "" };
        lines.push(format!(
            "Địa chỉ ví: {}{role}",
            short_address(&session.address)
        ));
    }
    if let Some(balance) = &state.balance {
        lines.push(format!("Số dư: {} {}", balance.amount, balance.symbol));
    }

    let controls = state.controls();
    let buttons: Vec<String> = OperationKind::ALL
        .into_iter()
        .map(|kind| {
            if state.busy.is_busy(kind) {
                "[Đang xử lý...]".to_string()
            } else if controls.is_enabled(kind) {
                format!("[{}]", label(kind))
            } else {
                format!("({})", label(kind))
            }
        })
        .collect();
    lines.push(buttons.join(" "));

    lines.join("\n")
}
