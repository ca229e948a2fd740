use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use messenger_archive_loader::error::{ArchiveError, ParseError};
use messenger_archive_loader::loader::{Loader, SequentialIds};
use messenger_archive_loader::models::{ConversationRecord, Participant, RawMessage};
use messenger_archive_loader::sql::tables::{ACTOR_ID, CONTENT, CONVERSATION_ID, MESSAGE_ID, TIMESTAMP};
use messenger_archive_loader::sql::{InsertMode, SqlValue, create_table, insert, message_table};
use messenger_archive_loader::{MessageSource, SqliteStore};

/// Serves the same synthetic conversation under `files` entry names
struct SyntheticArchive {
    files: usize,
    record: ConversationRecord,
}

impl SyntheticArchive {
    fn new(files: usize, messages: usize) -> Self {
        let record = ConversationRecord {
            title: None,
            participants: ["Alice", "Bob"]
                .iter()
                .map(|name| Participant { name: name.to_string() })
                .collect(),
            messages: (0..messages)
                .map(|i| RawMessage {
                    sender_name: Some(if i % 2 == 0 { "Alice" } else { "Bob" }.to_string()),
                    timestamp_ms: 1_533_900_000_000 + i as i64 * 1000,
                    content: Some(format!("Message number {} with someone's quote", i)),
                    message_type: Some("Generic".to_string()),
                })
                .collect(),
            thread_type: None,
        };
        Self { files, record }
    }
}

impl MessageSource for SyntheticArchive {
    fn list_message_files(&self) -> Result<Vec<String>, ArchiveError> {
        Ok((0..self.files).map(|i| format!("messages/inbox/t{}/message_1.json", i)).collect())
    }

    fn parse(&self, _entry: &str) -> Result<ConversationRecord, ParseError> {
        Ok(self.record.clone())
    }
}

fn bench_statement_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement_generation");
    let schema = message_table();

    group.bench_function("create_table", |b| {
        b.iter(|| create_table(black_box(&schema)));
    });

    group.bench_function("insert_message", |b| {
        b.iter(|| {
            insert(
                black_box(&schema),
                &[
                    (MESSAGE_ID, SqlValue::from("6f1c0d1e-7a44-4c1b-9a51-0b1f7c2e9d3a")),
                    (ACTOR_ID, SqlValue::from("0d2b7f7e-5c3a-4e8e-8f0b-1a2c3d4e5f60")),
                    (CONVERSATION_ID, SqlValue::from("9a8b7c6d-5e4f-4a3b-2c1d-0e9f8a7b6c5d")),
                    (TIMESTAMP, SqlValue::from(1_533_900_000_000i64)),
                    (CONTENT, SqlValue::from("It's a message with 'quotes' in it")),
                ],
                InsertMode::AllowDuplicates,
            )
            .unwrap()
        });
    });

    group.finish();
}

fn bench_populate(c: &mut Criterion) {
    let mut group = c.benchmark_group("populate");
    group.sample_size(10);

    for messages in [100, 1_000].iter() {
        let archive = SyntheticArchive::new(10, *messages);

        group.throughput(Throughput::Elements((*messages * 10) as u64));
        group.bench_with_input(BenchmarkId::new("in_memory", messages), messages, |b, _| {
            b.iter(|| {
                let store = SqliteStore::in_memory().unwrap();
                let mut loader = Loader::new(&archive, store, SequentialIds::default());
                black_box(loader.populate(true).unwrap())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_statement_generation, bench_populate);
criterion_main!(benches);
