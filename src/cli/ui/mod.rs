mod device_view;
mod frame_view;
mod listen_view;
mod painter;
mod state_view;
mod table;

pub(crate) use self::frame_view::FrameView;
pub(crate) use self::listen_view::{ListenNotificationView, ListenReadyView, ListenSummaryView};
pub(crate) use self::painter::Painter;
pub(crate) use self::state_view::{StateView, snapshot_label};
