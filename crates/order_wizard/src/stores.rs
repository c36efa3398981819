pub mod in_memory_session_store;
