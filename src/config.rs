/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 编译服务地址
    pub api_base_url: String,
    /// 导出文件保存目录
    pub download_dir: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 导出任务 TOML 文件
    pub job_file: String,
    /// 运行日志文件
    pub output_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            download_dir: "exports".to_string(),
            request_timeout_secs: 300,
            job_file: "export_job.toml".to_string(),
            output_log_file: "export_log.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("API_BASE_URL").unwrap_or(default.api_base_url),
            download_dir: std::env::var("DOWNLOAD_DIR").unwrap_or(default.download_dir),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            job_file: std::env::var("JOB_FILE").unwrap_or(default.job_file),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 去掉末尾斜杠的服务地址
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}
