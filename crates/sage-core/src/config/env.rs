use super::Config;

impl Config {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("SAGE_LLM_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Ok(v) = std::env::var("SAGE_LLM_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("SAGE_LLM_EMBEDDING_MODEL") {
            self.llm.embedding_model = v;
        }
        if let Ok(v) = std::env::var("SAGE_LLM_MAX_TOKENS")
            && let Ok(tokens) = v.parse::<u32>()
        {
            self.llm.max_tokens = tokens;
        }
        if let Ok(v) = std::env::var("SAGE_LLM_CONTEXT_LENGTH")
            && let Ok(len) = v.parse::<u64>()
        {
            self.llm.context_length = len;
        }
        if let Ok(v) = std::env::var("SAGE_CHUNK_WINDOW_SIZE")
            && let Ok(size) = v.parse::<usize>()
        {
            self.chunking.window_size = size;
        }
        if let Ok(v) = std::env::var("SAGE_CHUNK_OVERLAP")
            && let Ok(overlap) = v.parse::<usize>()
        {
            self.chunking.overlap = overlap;
        }
        if let Ok(v) = std::env::var("SAGE_TOP_K")
            && let Ok(k) = v.parse::<usize>()
        {
            self.retrieval.top_k = k;
        }
        if let Ok(v) = std::env::var("SAGE_SQLITE_PATH") {
            self.store.sqlite_path = v;
        }
        if let Ok(v) = std::env::var("SAGE_DISCOURSE_PATH") {
            self.ingest.discourse_path = v;
        }
        if let Ok(v) = std::env::var("SAGE_MARKDOWN_DIR") {
            self.ingest.markdown_dir = v;
        }
        if let Ok(v) = std::env::var("SAGE_GATEWAY_BIND") {
            self.gateway.bind = v;
        }
        if let Ok(v) = std::env::var("SAGE_GATEWAY_PORT")
            && let Ok(port) = v.parse::<u16>()
        {
            self.gateway.port = port;
        }
    }
}
