use crate::{
    convert::{
        ConversionError, ConversionOutcome, ConversionRequest, Converted, Converter,
        SourceDocument,
    },
    package::{png_file_name, Output},
};
use log::debug;
use std::{collections::HashMap, fmt::Display, rc::Rc};
use tokio::task::{JoinSet, LocalSet};

pub const DEFAULT_GROUP_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    Ready,
    Converting,
    Completed,
    Error,
}

impl ItemStatus {
    fn can_become(self, next: ItemStatus) -> bool {
        matches!(
            (self, next),
            (ItemStatus::Ready, ItemStatus::Converting)
                | (ItemStatus::Converting, ItemStatus::Completed)
                | (ItemStatus::Converting, ItemStatus::Error)
        )
    }
}

impl Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            ItemStatus::Ready => "ready",
            ItemStatus::Converting => "converting",
            ItemStatus::Completed => "completed",
            ItemStatus::Error => "error",
        };
        f.write_str(str)
    }
}

/// A named source document and where it is in the conversion pipeline.
#[derive(Debug)]
pub struct BatchItem {
    name: String,
    source: SourceDocument,
    status: ItemStatus,
    result: Option<Result<Converted, String>>,
}

impl BatchItem {
    pub fn new(name: impl Into<String>, source: SourceDocument) -> Self {
        Self {
            name: name.into(),
            source,
            status: ItemStatus::Ready,
            result: None,
        }
    }

    /// An item that failed before it could be queued, e.g. an unreadable file.
    pub fn failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: SourceDocument::new(""),
            status: ItemStatus::Error,
            result: Some(Err(reason.into())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn converted(&self) -> Option<&Converted> {
        self.result.as_ref().and_then(|result| result.as_ref().ok())
    }

    pub fn error(&self) -> Option<&str> {
        self.result
            .as_ref()
            .and_then(|result| result.as_ref().err())
            .map(String::as_str)
    }

    fn advance(&mut self, next: ItemStatus) {
        debug_assert!(
            self.status.can_become(next),
            "{} cannot go from {} to {next}",
            self.name,
            self.status
        );
        debug!("{}: {} -> {next}", self.name, self.status);
        self.status = next;
    }

    fn settle(&mut self, outcome: ConversionOutcome) {
        match outcome {
            Ok(converted) => {
                self.advance(ItemStatus::Completed);
                self.result = Some(Ok(converted));
            }
            Err(err) => {
                self.advance(ItemStatus::Error);
                self.result = Some(Err(err.to_string()));
            }
        }
    }
}

/// Converts every `Ready` item, `group_size` at a time.
///
/// Items in a group are in flight together on a single thread. The next group
/// starts only once the whole previous group has settled. `on_update` sees
/// every status change as it happens. A failing item never affects its
/// siblings.
pub async fn convert_batch<C, F>(
    items: &mut [BatchItem],
    request: &ConversionRequest,
    converter: Rc<C>,
    group_size: usize,
    mut on_update: F,
) where
    C: Converter + 'static,
    F: FnMut(&BatchItem),
{
    let queued = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.status == ItemStatus::Ready)
        .map(|(index, _)| index)
        .collect::<Vec<_>>();

    let local = LocalSet::new();
    local
        .run_until(async {
            for group in queued.chunks(group_size.max(1)) {
                let mut tasks = JoinSet::new();
                let mut task_items = HashMap::new();

                for &index in group {
                    let item = &mut items[index];
                    item.advance(ItemStatus::Converting);
                    on_update(item);

                    let converter = converter.clone();
                    let source = item.source.clone();
                    let request = request.clone();

                    let handle = tasks.spawn_local(async move {
                        converter.convert(&source, &request).await
                    });
                    task_items.insert(handle.id(), index);
                }

                while let Some(joined) = tasks.join_next_with_id().await {
                    let (id, outcome) = match joined {
                        Ok((id, outcome)) => (id, outcome),
                        Err(err) => (
                            err.id(),
                            Err(ConversionError::Other(format!("task failed: {err}"))),
                        ),
                    };

                    if let Some(&index) = task_items.get(&id) {
                        items[index].settle(outcome);
                        on_update(&items[index]);
                    }
                }
            }
        })
        .await;
}

/// Successful results in input order, named for download.
pub fn successful_outputs(items: &[BatchItem]) -> Vec<Output> {
    items
        .iter()
        .filter_map(|item| {
            item.converted().map(|converted| Output {
                file_name: png_file_name(&item.name),
                png: converted.png.clone(),
            })
        })
        .collect()
}
