use std::path::PathBuf;
use std::process::ExitCode;
use clap::Parser;
use log::{error, info};
use unscript_rust::{
    read_script_file,
    render,
    Conf,
    ConvertResult,
    OutputFormat,
    PreExtracted,
    ReadOptions,
};

/// 剧本格式转换：Fountain / Final Draft / OSF / Fade In / Highland / PDF
#[derive(Parser, Debug)]
#[command(name = "unscript", version, about)]
struct Args {
    /// 输入文件
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// 输出格式: fountain, html, json, fdx, osf, epub
    #[arg(long, default_value = "fountain")]
    to: OutputFormat,

    /// 输出文件，不指定时写到标准输出
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// 扩展名无法识别时使用的 MIME 类型
    #[arg(long)]
    mime: Option<String>,

    /// 覆盖标题
    #[arg(long)]
    title: Option<String>,

    /// 覆盖作者
    #[arg(long)]
    author: Option<String>,

    /// JSON 配置文件
    #[arg(long)]
    config: Option<PathBuf>,

    /// PDF 输入的版面 JSON（由外部工具提取）
    #[arg(long)]
    pdf_layout: Option<PathBuf>,
}

async fn run(args: Args) -> ConvertResult<()> {
    let conf = match &args.config {
        Some(path) => Conf::from_json(&tokio::fs::read_to_string(path).await?)?,
        None => Conf::default(),
    };
    let extractor = match &args.pdf_layout {
        Some(path) => Some(PreExtracted::from_json(&tokio::fs::read_to_string(path).await?)?),
        None => None,
    };
    let options = ReadOptions {
        mime: args.mime.clone(),
        title: args.title.clone(),
        author: args.author.clone(),
    };

    let script = read_script_file(
        &args.input,
        &options,
        &conf,
        extractor.as_ref().map(|e| e as &dyn unscript_rust::PdfExtractor),
    )
    .await?;
    let bytes = render(&script, args.to)?;

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, bytes).await?;
            info!("已写出 {}", path.display());
        }
        None => {
            use tokio::io::AsyncWriteExt;
            let mut stdout = tokio::io::stdout();
            stdout.write_all(&bytes).await?;
            stdout.flush().await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("转换失败: {}", e);
            ExitCode::FAILURE
        }
    }
}
